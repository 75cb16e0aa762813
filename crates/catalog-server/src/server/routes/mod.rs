//! API routes and handlers.

mod auth;
mod docs;
mod products;

pub use docs::docs_page;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::{auth::require_auth, error::ApiError, state::AppState};

/// Build the API router.
///
/// Reads, docs and auth endpoints are public; every product mutation and
/// `/auth/me` require a bearer token.
///
/// The auth layer wraps the protected method routers, so a path that only
/// has protected methods (`/products/batch`, `/products/batch/delete`,
/// `/auth/me`) answers 401 to an unauthenticated request before method
/// matching can answer 405.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(docs::openapi))
        .route("/swagger", get(docs::docs_page))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/products", post(products::create_product))
        .route(
            "/products/batch",
            put(products::batch_update).patch(products::batch_update),
        )
        .route("/products/batch/delete", post(products::batch_delete))
        .route(
            "/products/{id}",
            put(products::update_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}

/// JSON 404 for unknown API paths when no static UI is mounted.
pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

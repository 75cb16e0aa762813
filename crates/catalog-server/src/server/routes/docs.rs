//! API description and docs page.

use axum::{
    http::header,
    response::{Html, IntoResponse},
};

const OPENAPI: &str = include_str!("../../../assets/openapi.json");
const SWAGGER: &str = include_str!("../../../assets/swagger.html");

/// The OpenAPI document for every route the router serves.
pub async fn openapi() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        OPENAPI,
    )
}

/// Swagger UI over [`openapi`].
pub async fn docs_page() -> Html<&'static str> {
    Html(SWAGGER)
}

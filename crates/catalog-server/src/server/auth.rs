//! Bearer-token authentication for mutating routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use catalog::Identity;

use super::error::ApiError;
use super::state::AppState;

/// Route layer: resolve the bearer token to a stored user, or answer 401.
///
/// The resolved [`Identity`] is placed in the request extensions for
/// [`CurrentUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(ApiError::unauthorized)?;

    let identity = state
        .auth
        .verify_token(bearer.token())?
        .ok_or_else(|| {
            debug!("bearer token rejected");
            ApiError::unauthorized()
        })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// The authenticated user of a request that passed [`require_auth`].
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

//! Signup, login and identity handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use catalog::{Identity, Session};

use super::super::{auth::CurrentUser, body::LenientJson, error::ApiError, state::AppState};

/// Username and password, as sent by the signup and login forms.
#[derive(Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Register a user.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    LenientJson(credentials): LenientJson<Credentials>,
) -> Result<(StatusCode, Json<Identity>), ApiError> {
    let identity = state
        .auth
        .signup(&credentials.username, &credentials.password)?;
    Ok((StatusCode::CREATED, Json(identity)))
}

/// Exchange credentials for a token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    LenientJson(credentials): LenientJson<Credentials>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .auth
        .authenticate(&credentials.username, &credentials.password)?;
    Ok(Json(session))
}

/// The user the bearer token belongs to.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<Identity> {
    Json(user)
}

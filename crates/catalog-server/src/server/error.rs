//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

use catalog::{AuthError, ProductError, ProductId, StoreError};

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Product not found error.
    pub fn product_not_found(id: impl std::fmt::Display) -> Self {
        let id = id.to_string();
        Self::new(
            StatusCode::NOT_FOUND,
            "PRODUCT_NOT_FOUND",
            format!("Product '{}' not found", id),
        )
        .with_details(serde_json::json!({ "id": id }))
    }

    /// Route not found error.
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "not found")
    }

    /// Malformed batch field update.
    pub fn invalid_update(field: &str, reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_UPDATE", reason)
            .with_details(serde_json::json!({ "field": field }))
    }

    /// Missing or empty required input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
    }

    /// Username already taken.
    pub fn conflict(username: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "CONFLICT", "user exists")
            .with_details(serde_json::json!({ "username": username }))
    }

    /// Unknown user or wrong password.
    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "invalid credentials",
        )
    }

    /// Missing or unrecognized bearer token.
    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "authentication required",
        )
    }

    /// Request body could not be read.
    pub fn invalid_body(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, "INVALID_BODY", message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors at error level, client errors at debug level
        if self.status.is_server_error() {
            error!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "server error response"
            );
        } else if self.status.is_client_error() {
            debug!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "client error response"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InvalidUpdate { field, reason } => Self::invalid_update(&field, reason),
            ProductError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => Self::invalid_input(msg),
            AuthError::Conflict(username) => Self::conflict(&username),
            AuthError::InvalidCredentials => Self::invalid_credentials(),
            AuthError::Store(e) => e.into(),
        }
    }
}

/// Parse a product id path segment; anything that is not an id cannot
/// name a product.
pub fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse().map_err(|_| ApiError::product_not_found(raw))
}

//! Error types for authentication.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by signup and login.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("User already exists: {0}")]
    Conflict(String),

    /// Unknown user or wrong password; deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Error types for product operations.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by product operations.
///
/// A missing product is not an error: lookups return `None` and deletes
/// return `false`.
#[derive(Error, Debug)]
pub enum ProductError {
    #[error("Invalid update for '{field}': {reason}")]
    InvalidUpdate { field: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProductError {
    pub(crate) fn invalid_update(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUpdate {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

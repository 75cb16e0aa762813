//! Error types for the record store.

use thiserror::Error;

/// Errors raised while loading or saving the catalog document.
///
/// None of these are recoverable below the storage layer; callers surface
/// them as a failed request.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace catalog document: {0}")]
    Persist(#[from] tempfile::PersistError),
}

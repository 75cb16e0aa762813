//! Unified error type for the catalog library.

use thiserror::Error;

use crate::auth::AuthError;
use crate::products::ProductError;
use crate::store::StoreError;

/// Any error the catalog library can raise.
///
/// ```ignore
/// use catalog::{Result, RecordStore};
///
/// fn open() -> Result<()> {
///     let store = RecordStore::open("data.json")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if the failure came from durable storage, however it
    /// surfaced.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Product(ProductError::Store(_)) | Self::Auth(AuthError::Store(_))
        )
    }
}

//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use catalog::prelude::*;
//! ```

pub use crate::error::{Error, Result};

pub use crate::auth::{AuthError, AuthService, Identity, Session};
pub use crate::products::{
    BatchUpdate, FieldUpdate, ProductError, ProductPayload, ProductService, RelativeOp,
};
pub use crate::store::{
    CatalogDocument, Commit, JsonFileStorage, MemoryStorage, Product, ProductId, RecordStore,
    Storage, StoreError, User, UserId,
};

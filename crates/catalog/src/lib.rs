//! A product catalog kept in a single JSON document.
//!
//! The catalog holds product records and a small user table. Products can
//! be listed, searched, created, updated, deleted, and edited in bulk with
//! absolute or relative (`"+=10"`) field changes. Users sign up and log in
//! to obtain an opaque token that gates mutations at the HTTP layer.
//!
//! # Module Organization
//!
//! - [`store`]: the catalog document, its storage backends and the record store
//! - [`products`]: product operations, including batch updates
//! - [`auth`]: signup, login and token verification
//! - [`error`]: unified error types
//! - [`prelude`]: convenient re-exports
//!
//! # Features
//!
//! - `logging`: emit `tracing` events from library operations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog::prelude::*;
//!
//! let store = Arc::new(RecordStore::open("data.json")?);
//! let products = ProductService::new(store.clone());
//!
//! let lamp = products.create(serde_json::from_str(r#"{"name": "Lamp", "price": 20}"#)?)?;
//! let update = BatchUpdate::parse(serde_json::from_str(r#"{"price": "+=5"}"#)?)?;
//! products.batch_update(Some(&[lamp.id]), &update)?;
//! ```

pub mod auth;
pub mod error;
#[macro_use]
pub(crate) mod logging;
pub mod prelude;
pub mod products;
pub mod store;

pub use error::{Error, Result};

pub use auth::{AuthError, AuthService, Identity, Session};
pub use products::{BatchUpdate, FieldUpdate, ProductError, ProductPayload, ProductService};
pub use store::{
    CatalogDocument, JsonFileStorage, MemoryStorage, Product, ProductId, RecordStore, Storage,
    StoreError, User, UserId,
};

//! Application state management.

use std::sync::Arc;

use catalog::{AuthService, ProductService, RecordStore, StoreError};

use super::config::Config;

/// Shared application state: the product and auth services over one
/// record store.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub auth: AuthService,
}

impl AppState {
    /// Wrap an already opened store.
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            products: ProductService::new(store.clone()),
            auth: AuthService::new(store),
        }
    }

    /// Open (or initialize) the store named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let store = RecordStore::open(&config.store.path).map_err(|source| StateError::OpenStore {
            path: config.store.path.clone(),
            source,
        })?;
        Ok(Self::new(Arc::new(store)))
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open or initialize the catalog document.
    OpenStore { path: String, source: StoreError },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore { path, source } => {
                write!(f, "Failed to open catalog at '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::OpenStore { source, .. } => Some(source),
        }
    }
}

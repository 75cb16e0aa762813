//! In-process storage, used by tests and embedders that do not need
//! durability.

use std::sync::{Mutex, PoisonError};

use super::document::CatalogDocument;
use super::error::StoreError;
use super::Storage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    doc: Mutex<Option<CatalogDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_document(doc: CatalogDocument) -> Self {
        Self {
            doc: Mutex::new(Some(doc)),
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<CatalogDocument>, StoreError> {
        Ok(self
            .doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, doc: &CatalogDocument) -> Result<(), StoreError> {
        *self.doc.lock().unwrap_or_else(PoisonError::into_inner) = Some(doc.clone());
        Ok(())
    }
}

//! The record store: one catalog document, loaded and flushed on every
//! operation.
//!
//! Every operation reads the full document from its [`Storage`], works on
//! it, and (for mutations) writes the full document back before returning.
//! Nothing is cached between calls. A single document-wide lock serializes
//! the read-mutate-write cycle within one process; separate processes
//! sharing a file still race with last-write-wins semantics.

mod document;
mod error;
mod file;
mod memory;

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::logging::{debug, info};

pub use document::{
    coerce_number, number_value, text_value, CatalogDocument, Product, ProductId, User, UserId,
};
pub use error::StoreError;
pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Durable home of the catalog document.
pub trait Storage: Send + Sync {
    /// Load the document, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<CatalogDocument>, StoreError>;

    /// Replace the stored document.
    fn save(&self, doc: &CatalogDocument) -> Result<(), StoreError>;
}

/// Outcome of a [`RecordStore::transact`] closure.
#[derive(Debug)]
pub enum Commit<T> {
    /// Write the mutated document back, then return the value.
    Save(T),
    /// Drop any changes and return the value.
    Discard(T),
}

/// Owns the catalog document behind a [`Storage`].
pub struct RecordStore {
    storage: Box<dyn Storage>,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            lock: Mutex::new(()),
        }
    }

    /// Open a JSON file store, writing an empty document if the file does
    /// not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let storage = JsonFileStorage::new(path);

        if storage.load()?.is_none() {
            info!(path = %path.display(), "initializing empty catalog");
            storage.save(&CatalogDocument::default())?;
        } else {
            info!(path = %path.display(), "catalog opened");
        }

        Ok(Self::new(storage))
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Load the document and hand a shared view of it to `f`.
    pub fn read<T>(&self, f: impl FnOnce(&CatalogDocument) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let doc = self.load()?;
        Ok(f(&doc))
    }

    /// Load the document, let `f` mutate it, and save it if `f` asks to.
    ///
    /// An `Err` from `f` discards the changes.
    pub fn transact<T, E>(
        &self,
        f: impl FnOnce(&mut CatalogDocument) -> Result<Commit<T>, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.load()?;

        match f(&mut doc)? {
            Commit::Save(value) => {
                self.storage.save(&doc)?;
                Ok(value)
            }
            Commit::Discard(value) => {
                debug!("transaction made no changes");
                Ok(value)
            }
        }
    }

    /// A copy of the current document.
    pub fn snapshot(&self) -> Result<CatalogDocument, StoreError> {
        self.read(CatalogDocument::clone)
    }

    fn load(&self) -> Result<CatalogDocument, StoreError> {
        Ok(self.storage.load()?.unwrap_or_default())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

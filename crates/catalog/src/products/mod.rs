//! Product operations over the record store.

mod batch;
mod error;
mod payload;

use std::sync::Arc;

use crate::logging::{debug, info};
use crate::store::{Commit, Product, ProductId, RecordStore};

pub use batch::{BatchUpdate, FieldUpdate, RelativeOp};
pub use error::ProductError;
pub use payload::ProductPayload;

/// List, read, create, update and delete products.
///
/// Every call loads the catalog from the store; mutations write it back
/// before returning.
#[derive(Debug, Clone)]
pub struct ProductService {
    store: Arc<RecordStore>,
}

impl ProductService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// All products in store order, or only those whose name and
    /// description contain `query`, ignoring case.
    pub fn list(&self, query: Option<&str>) -> Result<Vec<Product>, ProductError> {
        let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());

        let products = self.store.read(|doc| match &needle {
            None => doc.products.clone(),
            Some(needle) => doc
                .products
                .iter()
                .filter(|p| p.search_text().to_lowercase().contains(needle.as_str()))
                .cloned()
                .collect(),
        })?;

        debug!(query = ?query, count = products.len(), "listed products");
        Ok(products)
    }

    pub fn get(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        let product = self
            .store
            .read(|doc| doc.products.iter().find(|p| p.id == id).cloned())?;
        Ok(product)
    }

    /// Create a product from partial fields. Any `id` in the payload is
    /// ignored; the store assigns one.
    pub fn create(&self, payload: ProductPayload) -> Result<Product, ProductError> {
        let product = self.store.transact(|doc| -> Result<_, ProductError> {
            let mut product = Product::new(doc.next_id);
            payload::merge(&mut product, payload)?;

            product.id = doc.allocate_product_id();
            doc.products.push(product.clone());
            Ok(Commit::Save(product))
        })?;

        info!(id = product.id, "product created");
        Ok(product)
    }

    /// Shallow-merge `payload` over an existing product. Returns `None` if
    /// no product has this id.
    pub fn update(
        &self,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Option<Product>, ProductError> {
        let updated = self.store.transact(|doc| -> Result<_, ProductError> {
            let Some(product) = doc.products.iter_mut().find(|p| p.id == id) else {
                return Ok(Commit::Discard(None));
            };
            payload::merge(product, payload)?;
            Ok(Commit::Save(Some(product.clone())))
        })?;

        if updated.is_some() {
            info!(id, "product updated");
        }
        Ok(updated)
    }

    /// Remove a product. Returns `false` if it did not exist, in which case
    /// nothing is written.
    pub fn delete(&self, id: ProductId) -> Result<bool, ProductError> {
        let removed = self.store.transact(|doc| -> Result<_, ProductError> {
            Ok(match doc.product_index(id) {
                Some(index) => {
                    doc.products.remove(index);
                    Commit::Save(true)
                }
                None => Commit::Discard(false),
            })
        })?;

        if removed {
            info!(id, "product deleted");
        }
        Ok(removed)
    }

    /// Apply `update` to every product whose id is in `ids`, or to every
    /// product when `ids` is `None`. Unknown ids are ignored. Returns the
    /// updated products in store order.
    pub fn batch_update(
        &self,
        ids: Option<&[ProductId]>,
        update: &BatchUpdate,
    ) -> Result<Vec<Product>, ProductError> {
        let updated = self.store.transact(|doc| -> Result<_, ProductError> {
            let mut updated = Vec::new();
            for product in doc.products.iter_mut() {
                if ids.is_some_and(|ids| !ids.contains(&product.id)) {
                    continue;
                }
                update.apply_to(product)?;
                updated.push(product.clone());
            }
            Ok(Commit::Save(updated))
        })?;

        info!(
            fields = update.len(),
            count = updated.len(),
            "batch update applied"
        );
        Ok(updated)
    }

    /// Remove every listed product that exists. Returns the ids actually
    /// removed, in the order given.
    pub fn batch_delete(&self, ids: &[ProductId]) -> Result<Vec<ProductId>, ProductError> {
        let deleted = self.store.transact(|doc| -> Result<_, ProductError> {
            let mut deleted = Vec::new();
            for &id in ids {
                if let Some(index) = doc.product_index(id) {
                    doc.products.remove(index);
                    deleted.push(id);
                }
            }
            Ok(if deleted.is_empty() {
                Commit::Discard(deleted)
            } else {
                Commit::Save(deleted)
            })
        })?;

        info!(requested = ids.len(), deleted = deleted.len(), "batch delete applied");
        Ok(deleted)
    }
}

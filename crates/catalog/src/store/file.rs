//! JSON file storage.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::logging::{debug, trace};

use super::document::CatalogDocument;
use super::error::StoreError;
use super::Storage;

/// Stores the whole catalog as one pretty-printed JSON file.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// reader never observes a partially written document.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<CatalogDocument>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "catalog file absent");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let doc = serde_json::from_str(&content)?;
        Ok(Some(doc))
    }

    fn save(&self, doc: &CatalogDocument) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut body = serde_json::to_vec_pretty(doc)?;
        body.push(b'\n');

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&body)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)?;

        debug!(
            path = %self.path.display(),
            products = doc.products.len(),
            users = doc.users.len(),
            "catalog saved"
        );
        Ok(())
    }
}

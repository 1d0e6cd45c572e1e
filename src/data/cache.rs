use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::load_file;
use super::model::MovieTable;
use crate::error::LoadError;

/// Loaded tables keyed by canonical source path.
///
/// Owned by a session. Sources are static, so entries never expire.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<PathBuf, Arc<MovieTable>>,
}

impl TableCache {
    /// Return the cached table for `path`, reading the file on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<MovieTable>, LoadError> {
        let key = path
            .canonicalize()
            .map_err(|_| LoadError::NotFound(path.to_path_buf()))?;

        if let Some(table) = self.tables.get(&key) {
            log::debug!("Cache hit for {}", key.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_file(&key)?);
        log::info!(
            "Loaded {} movies spanning {} distinct years from {}",
            table.len(),
            table.years().len(),
            key.display()
        );
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

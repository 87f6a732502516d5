//! Shared cache of loaded template spectra

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use super::{CatalogError, TemplateId, TemplateStore};
use crate::photometry::Spectrum;

/// Memoizes [`TemplateStore::load`] so each template file is read once.
///
/// Spectra are handed out as `Arc<Spectrum>`; callers that need to modify one
/// clone it. Failed loads are not cached.
#[derive(Debug)]
pub struct TemplateCache {
    store: TemplateStore,
    entries: Arc<Mutex<HashMap<TemplateId, Arc<Spectrum>>>>,
}

impl TemplateCache {
    pub fn new(store: TemplateStore) -> Self {
        Self {
            store,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<TemplateId, Arc<Spectrum>>> {
        // A panic while holding the lock cannot leave a half-inserted entry
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the cached spectrum or load it from the store
    pub fn get(&self, id: &TemplateId) -> Result<Arc<Spectrum>, CatalogError> {
        if let Some(spectrum) = self.entries().get(id) {
            debug!("Template cache hit for {} '{}'", id.catalog(), id);
            return Ok(Arc::clone(spectrum));
        }

        // Load outside the lock; a concurrent load of the same ID just wins the race
        let spectrum = Arc::new(self.store.load(id)?);
        let mut entries = self.entries();
        let cached = entries.entry(*id).or_insert(spectrum);
        Ok(Arc::clone(cached))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl Clone for TemplateCache {
    /// Clones share the same entries
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_loads_are_not_cached() {
        let cache = TemplateCache::new(TemplateStore::new("/nonexistent/templates"));
        let id = TemplateId::from_names("Kurucz", "G:2:V").unwrap();
        assert!(matches!(
            cache.get(&id),
            Err(CatalogError::FileNotFound { .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TemplateCache::new(TemplateStore::new("/nonexistent/templates"));
        let other = cache.clone();
        assert_eq!(other.store().root(), cache.store().root());
        cache.clear();
        assert_eq!(other.len(), 0);
    }
}

//! Filesystem-backed template store

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::fits::read_template;
use super::{Catalog, CatalogError, TemplateId};
use crate::photometry::Spectrum;

/// Resolves template IDs to files under a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a template file. The file may not exist.
    pub fn path_for(&self, id: &TemplateId) -> PathBuf {
        self.root.join(id.relative_path())
    }

    pub fn contains(&self, id: &TemplateId) -> bool {
        self.path_for(id).is_file()
    }

    /// Load a template spectrum from disk
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::FileNotFound`] when the resolved path does not
    /// exist, otherwise any error from reading the FITS table.
    pub fn load(&self, id: &TemplateId) -> Result<Spectrum, CatalogError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(CatalogError::FileNotFound { path });
        }
        info!("Loading {} template '{}' from {}", id.catalog(), id, path.display());
        read_template(&path)
    }

    /// Parse `(catalog, id)` strings and load the template
    pub fn load_by_name(&self, catalog: &str, id: &str) -> Result<Spectrum, CatalogError> {
        self.load(&TemplateId::from_names(catalog, id)?)
    }

    /// IDs of every template of `catalog` present on disk.
    ///
    /// Name and spectral-class catalogs are listed in table order; the
    /// stellar grids are listed in directory order after sorting by file name.
    pub fn list(&self, catalog: Catalog) -> Result<Vec<TemplateId>, CatalogError> {
        if let Some(candidates) = TemplateId::enumerate(catalog) {
            return Ok(candidates.into_iter().filter(|id| self.contains(id)).collect());
        }

        let dir = self.root.join(catalog.dir_name());
        if !dir.is_dir() {
            debug!("No {} directory at {}", catalog, dir.display());
            return Ok(Vec::new());
        }

        let io_err = |source| CatalogError::Io {
            path: dir.clone(),
            source,
        };
        let mut file_names = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if let Some(name) = entry.file_name().to_str() {
                file_names.push(name.to_string());
            }
        }
        file_names.sort();

        Ok(file_names
            .iter()
            .filter_map(|name| TemplateId::from_file_name(catalog, name))
            .collect())
    }
}

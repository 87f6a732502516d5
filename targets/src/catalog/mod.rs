//! Template catalogs
//!
//! Seven spectral libraries live under a common templates root, one
//! subdirectory each. A [`TemplateId`] is a validated (catalog, id) pair that
//! knows its on-disk file name; [`TemplateStore`] resolves and reads it and
//! [`TemplateCache`] keeps loaded spectra around for reuse.

pub mod cache;
pub mod fits;
pub mod ids;
pub mod names;
pub mod store;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::photometry::Spectrum;

pub use cache::TemplateCache;
pub use ids::{IdError, KuruczId, LuminosityClass, MarcsId, PhoenixId, PicklesId, SpectralClass};
pub use names::NamedTemplate;
pub use store::TemplateStore;

/// Errors raised while resolving or reading a catalog template
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unsupported catalog: {0}")]
    UnsupportedCatalog(String),

    #[error("Missing '{0}' for template lookup")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error("Template file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read FITS template {}: {source}", .path.display())]
    Fits {
        path: PathBuf,
        #[source]
        source: Box<fitsio::errors::Error>,
    },

    #[error("Malformed template {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// True when the request itself was bad, as opposed to the filesystem
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::UnsupportedCatalog(_)
                | CatalogError::MissingField(_)
                | CatalogError::InvalidId(_)
        )
    }
}

/// Anything that can hand out template spectra by ID
pub trait TemplateSource {
    fn template(&self, id: &TemplateId) -> Result<Spectrum, CatalogError>;
}

impl TemplateSource for TemplateStore {
    fn template(&self, id: &TemplateId) -> Result<Spectrum, CatalogError> {
        self.load(id)
    }
}

impl TemplateSource for TemplateCache {
    fn template(&self, id: &TemplateId) -> Result<Spectrum, CatalogError> {
        self.get(id).map(|spectrum| (*spectrum).clone())
    }
}

/// The supported template libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Marcs,
    Phoenix,
    Swire,
    Kinney,
    Kurucz,
    Pickles,
    Various,
}

impl Catalog {
    pub const ALL: [Catalog; 7] = [
        Catalog::Marcs,
        Catalog::Phoenix,
        Catalog::Swire,
        Catalog::Kinney,
        Catalog::Kurucz,
        Catalog::Pickles,
        Catalog::Various,
    ];

    /// Canonical catalog name, also used as its subdirectory
    pub fn name(self) -> &'static str {
        match self {
            Catalog::Marcs => "MARCS",
            Catalog::Phoenix => "PHOENIX",
            Catalog::Swire => "SWIRE",
            Catalog::Kinney => "Kinney",
            Catalog::Kurucz => "Kurucz",
            Catalog::Pickles => "Pickles",
            Catalog::Various => "Various",
        }
    }

    pub fn dir_name(self) -> &'static str {
        self.name()
    }

    /// Name table for the catalogs addressed by descriptive name
    fn name_table(self) -> Option<&'static [NamedTemplate]> {
        match self {
            Catalog::Swire => Some(names::SWIRE),
            Catalog::Kinney => Some(names::KINNEY),
            Catalog::Various => Some(names::VARIOUS),
            _ => None,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Catalog {
    type Err = CatalogError;

    /// Exact, case-sensitive match on the catalog name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| CatalogError::UnsupportedCatalog(s.to_string()))
    }
}

/// A validated reference to one template file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Marcs(MarcsId),
    Phoenix(PhoenixId),
    Swire(NamedTemplate),
    Kinney(NamedTemplate),
    Kurucz(KuruczId),
    Pickles(PicklesId),
    Various(NamedTemplate),
}

impl TemplateId {
    /// Parse `id` using the grammar of `catalog`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`] if the ID does not match the
    /// catalog's grammar, allowed ranges, or name table.
    pub fn parse(catalog: Catalog, id: &str) -> Result<Self, CatalogError> {
        let template = match catalog {
            Catalog::Marcs => TemplateId::Marcs(id.parse()?),
            Catalog::Phoenix => TemplateId::Phoenix(id.parse()?),
            Catalog::Kurucz => TemplateId::Kurucz(id.parse()?),
            Catalog::Pickles => TemplateId::Pickles(id.parse()?),
            Catalog::Swire => TemplateId::Swire(names::lookup("SWIRE", names::SWIRE, id)?),
            Catalog::Kinney => TemplateId::Kinney(names::lookup("Kinney", names::KINNEY, id)?),
            Catalog::Various => TemplateId::Various(names::lookup("Various", names::VARIOUS, id)?),
        };
        Ok(template)
    }

    /// Parse from the catalog and id strings of a descriptor
    pub fn from_names(catalog: &str, id: &str) -> Result<Self, CatalogError> {
        Self::parse(catalog.parse()?, id)
    }

    pub fn catalog(&self) -> Catalog {
        match self {
            TemplateId::Marcs(_) => Catalog::Marcs,
            TemplateId::Phoenix(_) => Catalog::Phoenix,
            TemplateId::Swire(_) => Catalog::Swire,
            TemplateId::Kinney(_) => Catalog::Kinney,
            TemplateId::Kurucz(_) => Catalog::Kurucz,
            TemplateId::Pickles(_) => Catalog::Pickles,
            TemplateId::Various(_) => Catalog::Various,
        }
    }

    /// File name within the catalog's subdirectory
    pub fn file_name(&self) -> String {
        match self {
            TemplateId::Marcs(id) => id.file_name(),
            TemplateId::Phoenix(id) => id.file_name(),
            TemplateId::Kurucz(id) => id.file_name(),
            TemplateId::Pickles(id) => id.file_name(),
            TemplateId::Swire(t) | TemplateId::Kinney(t) | TemplateId::Various(t) => {
                t.file_name.to_string()
            }
        }
    }

    /// Path relative to the templates root
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.catalog().dir_name()).join(self.file_name())
    }

    /// Every ID whose grammar admits enumeration, in table order.
    ///
    /// The stellar atmosphere grids are too dense to enumerate and return
    /// `None`; list them by scanning the catalog directory instead.
    pub fn enumerate(catalog: Catalog) -> Option<Vec<TemplateId>> {
        if let Some(table) = catalog.name_table() {
            let wrap = match catalog {
                Catalog::Swire => TemplateId::Swire,
                Catalog::Kinney => TemplateId::Kinney,
                _ => TemplateId::Various,
            };
            return Some(table.iter().copied().map(wrap).collect());
        }
        match catalog {
            Catalog::Kurucz => Some(KuruczId::all().into_iter().map(TemplateId::Kurucz).collect()),
            Catalog::Pickles => Some(PicklesId::all().into_iter().map(TemplateId::Pickles).collect()),
            _ => None,
        }
    }

    /// Recover an ID from a file name in a grid catalog directory
    pub fn from_file_name(catalog: Catalog, file_name: &str) -> Option<TemplateId> {
        match catalog {
            Catalog::Marcs => MarcsId::from_file_name(file_name).map(TemplateId::Marcs),
            Catalog::Phoenix => PhoenixId::from_file_name(file_name).map(TemplateId::Phoenix),
            _ => TemplateId::enumerate(catalog)?
                .into_iter()
                .find(|id| id.file_name() == file_name),
        }
    }
}

impl fmt::Display for TemplateId {
    /// Formats as the catalog-specific ID string, parseable by [`TemplateId::parse`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateId::Marcs(id) => id.fmt(f),
            TemplateId::Phoenix(id) => id.fmt(f),
            TemplateId::Kurucz(id) => id.fmt(f),
            TemplateId::Pickles(id) => id.fmt(f),
            TemplateId::Swire(t) | TemplateId::Kinney(t) | TemplateId::Various(t) => t.fmt(f),
        }
    }
}

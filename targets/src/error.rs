//! Top-level error type

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::morphology::MorphologyError;
use crate::sed::SedError;

/// Broad class of a failure, for callers deciding how to report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was malformed or out of range
    Validation,
    /// Backing data such as a template file is missing or unreadable
    Resource,
    /// The request names a recognized but unimplemented feature
    Unsupported,
}

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Invalid target descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("Morphology error: {0}")]
    Morphology(#[from] MorphologyError),

    #[error("SED error: {0}")]
    Sed(#[from] SedError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TargetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TargetError::Descriptor(_) | TargetError::Morphology(_) => ErrorKind::Validation,
            TargetError::Config(_) => ErrorKind::Resource,
            TargetError::Sed(SedError::UploadNotSupported) => ErrorKind::Unsupported,
            TargetError::Sed(SedError::Catalog(e)) if !e.is_validation() => ErrorKind::Resource,
            TargetError::Sed(_) => ErrorKind::Validation,
        }
    }
}

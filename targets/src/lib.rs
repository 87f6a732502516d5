//! Target model engine for the ELVIS exposure time calculator
//!
//! Turns a declarative target descriptor into a physical source model: a
//! spatial product (point table or normalized flux image) and a spectral
//! energy distribution.
//!
//! - [`morphology`]: point sources, uniform infinite sources, Sérsic profiles
//! - [`sed`]: catalog templates and analytic spectra with extinction and redshift
//! - [`catalog`]: template ID grammars and the FITS template store
//! - [`photometry`]: spectra, reddening laws and analytic models
//! - [`target`]: the (morphology, SED) facade

pub mod algo;
pub mod catalog;
pub mod config;
pub mod error;
pub mod morphology;
pub mod photometry;
pub mod sed;
pub mod target;

pub use catalog::{Catalog, TemplateCache, TemplateId, TemplateSource, TemplateStore};
pub use config::{EngineArgs, EngineConfig};
pub use error::{ErrorKind, TargetError};
pub use morphology::{FieldRequest, MorphologyDescriptor, SpatialProduct};
pub use photometry::Spectrum;
pub use sed::{Advisory, SedDescriptor, SedProduct};
pub use target::{SourceModel, TargetDescriptor, TargetModel};

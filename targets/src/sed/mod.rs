//! Spectral energy distributions
//!
//! A [`SedDescriptor`] names a base spectrum (catalog template or analytic
//! model) plus optional extinction and redshift. Synthesis builds the base
//! spectrum, multiplies in the extinction curve on the spectrum's own grid,
//! then stretches the grid by (1+z).

pub mod descriptor;

use std::fmt;

use log::{debug, warn};
use thiserror::Error;

use crate::catalog::{CatalogError, TemplateSource};
use crate::photometry::{ExtinctionError, Spectrum, SpectrumError};

pub use descriptor::{RedshiftSpec, SedDescriptor, SpectrumModel};

/// Errors raised while parsing or synthesizing an SED
#[derive(Debug, Error)]
pub enum SedError {
    #[error("Unsupported sedtype/spectrumtype: {sedtype}/{spectrumtype}")]
    UnsupportedType { sedtype: String, spectrumtype: String },

    #[error("'upload' spectrum type is not yet supported.")]
    UploadNotSupported,

    #[error("Invalid SED descriptor: {0}")]
    Descriptor(String),

    #[error("{model} spectrum requires '{name}' parameter.")]
    MissingParameter { model: &'static str, name: &'static str },

    #[error("'{name}' must be numeric, got {value}")]
    NotNumeric { name: &'static str, value: String },

    #[error("'{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Blackbody 'temperature' outside acceptable range [0, 1e5]: {0}")]
    TemperatureOutOfRange(f64),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Extinction(#[from] ExtinctionError),

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// Recognized inputs that do not change the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    BaryVelCorIgnored,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::BaryVelCorIgnored => {
                write!(f, "'baryvelcor' was detected, but has no effect on the spectrum")
            }
        }
    }
}

/// The spectral half of a source model
#[derive(Debug, Clone, PartialEq)]
pub struct SedProduct {
    pub spectrum: Spectrum,
    pub advisories: Vec<Advisory>,
}

impl SedDescriptor {
    /// Build the spectrum described by this descriptor
    ///
    /// # Arguments
    ///
    /// * `templates` - Where catalog templates are read from
    ///
    /// # Errors
    ///
    /// Returns [`SedError::UploadNotSupported`] for uploaded spectra, a
    /// catalog error when a template cannot be loaded, and an extinction error
    /// when the spectrum extends outside the reddening laws' validity.
    pub fn synthesize<S>(&self, templates: &S) -> Result<SedProduct, SedError>
    where
        S: TemplateSource + ?Sized,
    {
        let mut spectrum = match &self.model {
            SpectrumModel::Template(id) => templates.template(id)?,
            SpectrumModel::Blackbody(bb) => bb.spectrum()?,
            SpectrumModel::PowerLaw(law) => law.spectrum()?,
            SpectrumModel::EmissionLine(line) => line.spectrum()?,
            SpectrumModel::Upload => return Err(SedError::UploadNotSupported),
        };
        debug!(
            "Built {} spectrum with {} samples over {:?} AA",
            self.model.kind(),
            spectrum.len(),
            spectrum.range()
        );

        if let Some(extinction) = &self.extinction {
            debug!("Applying A_V={} R_V={} extinction", extinction.a_v, extinction.r_v);
            let curve = extinction.curve(spectrum.wavelengths())?;
            spectrum = spectrum.multiply(&curve);
        }

        if let Some(redshift) = &self.redshift {
            debug!("Applying redshift z={} ({:?})", redshift.z, redshift.mode);
            spectrum = spectrum.redshifted(redshift.z, redshift.mode)?;
        }

        let mut advisories = Vec::new();
        if self.baryvelcor {
            let advisory = Advisory::BaryVelCorIgnored;
            warn!("{}", advisory);
            advisories.push(advisory);
        }

        Ok(SedProduct {
            spectrum,
            advisories,
        })
    }
}

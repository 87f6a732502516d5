//! Dimensionless throughput curves (filters, attenuation, transmission)

use thiserror::Error;

use crate::algo::misc::{interp_unchecked, validate_table, InterpError};

/// Errors that can occur when building a throughput curve
#[derive(Debug, Error, PartialEq)]
pub enum ThroughputError {
    #[error("Invalid throughput table: {0}")]
    Table(#[from] InterpError),

    #[error("Throughput values must be finite and non-negative, got {0}")]
    InvalidValue(f64),
}

/// A dimensionless curve sampled on its own wavelength grid.
///
/// Wavelengths are in Angstrom. Between samples the curve is linearly
/// interpolated; outside the sampled range it is zero, so multiplying a
/// spectrum by a curve never invents transmission where none was defined.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputCurve {
    /// Wavelengths in Angstrom
    wavelengths: Vec<f64>,

    /// Throughput value at each wavelength
    values: Vec<f64>,
}

impl ThroughputCurve {
    /// Create a new curve from wavelength and value tables
    ///
    /// # Arguments
    ///
    /// * `wavelengths` - Wavelengths in Angstrom, strictly increasing
    /// * `values` - Non-negative throughput for each wavelength
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vectors have different lengths or fewer than 2 samples
    /// - Wavelengths are not strictly increasing
    /// - Any value is negative or non-finite
    pub fn from_table(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self, ThroughputError> {
        validate_table(&wavelengths, &values)?;

        if let Some(&bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(ThroughputError::InvalidValue(bad));
        }

        Ok(Self {
            wavelengths,
            values,
        })
    }

    /// Get the throughput at a specific wavelength in Angstrom
    ///
    /// If the wavelength is outside the defined range, returns 0.0
    pub fn at(&self, wavelength: f64) -> f64 {
        let last = self.wavelengths.len() - 1;
        if wavelength < self.wavelengths[0] || wavelength > self.wavelengths[last] {
            return 0.0;
        }
        interp_unchecked(wavelength, &self.wavelengths, &self.values)
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Wavelength range covered by the curve, in Angstrom
    pub fn range(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.wavelengths.len() - 1])
    }
}

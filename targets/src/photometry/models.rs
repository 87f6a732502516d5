//! Analytic spectrum models
//!
//! Closed-form SEDs evaluated onto a sampled [`Spectrum`]:
//! - [`Blackbody`]: Planck's law for a given temperature
//! - [`PowerLaw`]: F(λ) = (λ / 1 µm)^(-α)
//! - [`GaussianLine`]: unit-amplitude emission line

use super::spectrum::{FluxUnit, Spectrum, SpectrumError, ANGSTROM_PER_MICRON, CGS};
use crate::algo::misc::logspace;

/// Shortest wavelength of the default analytic grid in Angstrom (0.1 µm)
pub const DEFAULT_GRID_MIN_AA: f64 = 1000.0;

/// Longest wavelength of the default analytic grid in Angstrom (30 µm)
pub const DEFAULT_GRID_MAX_AA: f64 = 300000.0;

/// Number of samples in the default analytic grid
pub const DEFAULT_GRID_SAMPLES: usize = 2000;

/// Line profiles are sampled out to this many sigma either side of the center
const LINE_HALF_WIDTH_SIGMA: usize = 5;

/// Line profile samples per sigma
const LINE_SAMPLES_PER_SIGMA: usize = 10;

/// Smallest line grid spacing, in units of the center's float resolution
const MIN_LINE_STEP_ULPS: f64 = 4.0;

/// Wavelength grid used for continuum models, in Angstrom
pub fn default_wavelength_grid() -> Vec<f64> {
    logspace(DEFAULT_GRID_MIN_AA, DEFAULT_GRID_MAX_AA, DEFAULT_GRID_SAMPLES)
}

/// Blackbody surface brightness following Planck's law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blackbody {
    /// Temperature in Kelvin
    pub temperature_k: f64,
}

impl Blackbody {
    pub fn new(temperature_k: f64) -> Self {
        Self { temperature_k }
    }

    /// Spectral radiance at a wavelength
    ///
    /// # Arguments
    ///
    /// * `wavelength_aa` - Wavelength in Angstrom
    ///
    /// # Returns
    ///
    /// B_λ in erg s⁻¹ cm⁻² Å⁻¹ sr⁻¹. Zero for a zero temperature and wherever
    /// the Wien exponential overflows.
    pub fn radiance(&self, wavelength_aa: f64) -> f64 {
        if self.temperature_k <= 0.0 || wavelength_aa <= 0.0 {
            return 0.0;
        }

        let wavelength_cm = wavelength_aa * CGS::ANGSTROM_IN_CM;
        let exponent = CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT
            / (wavelength_cm * CGS::BOLTZMANN_CONSTANT * self.temperature_k);
        let denominator = exponent.exp_m1();
        if !denominator.is_finite() {
            return 0.0;
        }

        // Per cm of wavelength, then per Angstrom
        let per_cm = 2.0 * CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT.powi(2)
            / wavelength_cm.powi(5)
            / denominator;
        per_cm * CGS::ANGSTROM_IN_CM
    }

    /// Wien's displacement peak in Angstrom
    pub fn peak_wavelength(&self) -> f64 {
        // b = 0.2897771955 cm K
        0.289_777_195_5 / self.temperature_k / CGS::ANGSTROM_IN_CM
    }

    /// Sample onto the default continuum grid
    pub fn spectrum(&self) -> Result<Spectrum, SpectrumError> {
        let wavelengths = default_wavelength_grid();
        let flux = wavelengths.iter().map(|&w| self.radiance(w)).collect();
        Spectrum::new(wavelengths, flux, FluxUnit::FlamPerSteradian)
    }
}

/// Power law normalized to one at 1 µm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    /// Exponent α in F(λ) = (λ / 1 µm)^(-α)
    pub exponent: f64,
}

impl PowerLaw {
    /// Reference wavelength in Angstrom where the flux equals one
    pub const REFERENCE_AA: f64 = ANGSTROM_PER_MICRON;

    pub fn new(exponent: f64) -> Self {
        Self { exponent }
    }

    pub fn flux(&self, wavelength_aa: f64) -> f64 {
        (wavelength_aa / Self::REFERENCE_AA).powf(-self.exponent)
    }

    /// Sample onto the default continuum grid
    pub fn spectrum(&self) -> Result<Spectrum, SpectrumError> {
        let wavelengths = default_wavelength_grid();
        let flux = wavelengths.iter().map(|&w| self.flux(w)).collect();
        Spectrum::new(wavelengths, flux, FluxUnit::Normalized)
    }
}

/// Gaussian emission line with unit peak amplitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianLine {
    /// Line center in Angstrom
    pub center_aa: f64,

    /// Gaussian standard deviation in Angstrom
    pub sigma_aa: f64,
}

impl GaussianLine {
    /// Build a line from its full width at half maximum
    ///
    /// σ = FWHM / (2 √(2 ln 2))
    pub fn from_fwhm(center_aa: f64, fwhm_aa: f64) -> Self {
        let sigma_aa = fwhm_aa / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt());
        Self {
            center_aa,
            sigma_aa,
        }
    }

    pub fn flux(&self, wavelength_aa: f64) -> f64 {
        let d = (wavelength_aa - self.center_aa) / self.sigma_aa;
        (-0.5 * d * d).exp()
    }

    /// Sample the line over ±5σ at σ/10 spacing.
    ///
    /// The center is always an exact grid sample so the peak sits at the
    /// requested wavelength. For lines narrower than the float resolution at
    /// the center, the spacing widens to a few ulps to keep the grid increasing.
    pub fn spectrum(&self) -> Result<Spectrum, SpectrumError> {
        let half = (LINE_HALF_WIDTH_SIGMA * LINE_SAMPLES_PER_SIGMA) as i64;
        let min_step = MIN_LINE_STEP_ULPS * f64::EPSILON * self.center_aa.abs();
        let step = (self.sigma_aa / LINE_SAMPLES_PER_SIGMA as f64).max(min_step);

        let wavelengths: Vec<f64> = (-half..=half)
            .map(|i| self.center_aa + step * i as f64)
            .filter(|w| *w > 0.0)
            .collect();
        let flux = wavelengths.iter().map(|&w| self.flux(w)).collect();
        Spectrum::new(wavelengths, flux, FluxUnit::Normalized)
    }
}

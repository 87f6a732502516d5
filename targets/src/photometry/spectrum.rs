//! Sampled spectrum model
//!
//! A [`Spectrum`] is an ordered wavelength grid paired with flux values. All
//! wavelengths are stored in Angstrom; the flux unit is carried as a tag and
//! never converted.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::throughput::ThroughputCurve;
use super::trapezoid::{trap_integrate, TrapezoidError};
use crate::algo::misc::{interp_unchecked, validate_table, InterpError};

/// Constants in CGS units
pub struct CGS {}

impl CGS {
    /// Planck's constant
    /// Units: 6.62607015e-27 erg⋅s (erg-seconds in CGS)
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-27;

    /// Speed of light in vacuum
    /// Units: 2.99792458e10 cm/s (centimeters per second in CGS)
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

    /// Boltzmann constant
    /// Units: 1.380649e-16 erg/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-16;

    /// One Angstrom in centimeters
    pub const ANGSTROM_IN_CM: f64 = 1e-8;
}

/// Angstrom per micron, the unit the reddening laws are written in
pub const ANGSTROM_PER_MICRON: f64 = 1e4;

/// Errors that can occur with spectrum operations
#[derive(Debug, Error, PartialEq)]
pub enum SpectrumError {
    #[error("Invalid wavelength grid: {0}")]
    Grid(#[from] InterpError),

    #[error("Wavelengths must be positive, got {0}")]
    NonPositiveWavelength(f64),

    #[error("Flux at sample {index} is not finite: {value}")]
    NonFiniteFlux { index: usize, value: f64 },

    #[error("Redshift must be finite and greater than -1, got {0}")]
    InvalidRedshift(f64),

    #[error("Integration failed: {0}")]
    Integration(#[from] TrapezoidError),

    #[error("Unknown wavelength unit '{0}'")]
    UnknownWavelengthUnit(String),

    #[error("Unknown flux unit '{0}'")]
    UnknownFluxUnit(String),
}

/// Wavelength units accepted from template files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavelengthUnit {
    Angstrom,
    Nanometer,
    Micron,
    Meter,
}

impl WavelengthUnit {
    /// Multiplicative factor converting this unit to Angstrom
    pub fn to_angstrom(self) -> f64 {
        match self {
            WavelengthUnit::Angstrom => 1.0,
            WavelengthUnit::Nanometer => 10.0,
            WavelengthUnit::Micron => ANGSTROM_PER_MICRON,
            WavelengthUnit::Meter => 1e10,
        }
    }
}

impl FromStr for WavelengthUnit {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "aa" | "a" | "angstrom" | "angstroms" => Ok(WavelengthUnit::Angstrom),
            "nm" | "nanometer" | "nanometers" => Ok(WavelengthUnit::Nanometer),
            "um" | "micron" | "microns" | "micrometer" => Ok(WavelengthUnit::Micron),
            "m" | "meter" | "meters" => Ok(WavelengthUnit::Meter),
            _ => Err(SpectrumError::UnknownWavelengthUnit(s.to_string())),
        }
    }
}

/// Flux unit tag carried by a spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxUnit {
    /// erg s⁻¹ cm⁻² Å⁻¹
    Flam,
    /// erg s⁻¹ cm⁻² Å⁻¹ sr⁻¹ (surface brightness)
    FlamPerSteradian,
    /// Unitless shape with a fixed reference amplitude
    Normalized,
}

impl fmt::Display for FluxUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluxUnit::Flam => write!(f, "FLAM"),
            FluxUnit::FlamPerSteradian => write!(f, "FLAM/sr"),
            FluxUnit::Normalized => write!(f, "normalized"),
        }
    }
}

impl FromStr for FluxUnit {
    type Err = SpectrumError;

    /// Accepts `FLAM` and the usual spellings of erg s⁻¹ cm⁻² Å⁻¹, optionally
    /// per steradian. Flux values are never converted, only tagged.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '*' | '.' | '^'))
            .collect::<String>()
            .to_ascii_lowercase();

        let is_flam = |unit: &str| {
            matches!(
                unit,
                "flam"
                    | "erg/s/cm2/a"
                    | "erg/s/cm2/aa"
                    | "erg/s/cm2/angstrom"
                    | "erg/cm2/s/a"
                    | "erg/cm2/s/angstrom"
                    | "ergs/cm2/a"
                    | "ergs-1cm-2a-1"
                    | "ergs-1cm-2aa-1"
                    | "ergs-1cm-2angstrom-1"
            )
        };

        match compact.as_str() {
            "normalized" | "dimensionless" | "arbitrary" => Ok(FluxUnit::Normalized),
            unit if is_flam(unit) => Ok(FluxUnit::Flam),
            unit => match unit
                .strip_suffix("/sr")
                .or_else(|| unit.strip_suffix("sr-1"))
            {
                Some(base) if is_flam(base) => Ok(FluxUnit::FlamPerSteradian),
                _ => Err(SpectrumError::UnknownFluxUnit(s.to_string())),
            },
        }
    }
}

/// How a redshift treats the flux values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedshiftMode {
    /// Only the wavelength grid is stretched by (1+z)
    #[default]
    WavelengthOnly,
    /// The grid is stretched and flux density divided by (1+z)
    ConserveFlux,
}

/// A flux-vs-wavelength spectrum on a strictly increasing grid
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Wavelengths in Angstrom
    wavelengths: Vec<f64>,

    /// Flux values, one per wavelength
    flux: Vec<f64>,

    unit: FluxUnit,
}

impl Spectrum {
    /// Create a new spectrum from a wavelength grid in Angstrom
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is not strictly increasing, has fewer
    /// than two samples, contains non-positive wavelengths, or if any flux is
    /// not finite.
    pub fn new(wavelengths: Vec<f64>, flux: Vec<f64>, unit: FluxUnit) -> Result<Self, SpectrumError> {
        validate_table(&wavelengths, &flux)?;

        if wavelengths[0] <= 0.0 {
            return Err(SpectrumError::NonPositiveWavelength(wavelengths[0]));
        }

        if let Some((index, &value)) = flux.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SpectrumError::NonFiniteFlux { index, value });
        }

        Ok(Self {
            wavelengths,
            flux,
            unit,
        })
    }

    /// Create a spectrum from a grid given in another wavelength unit
    pub fn with_wavelength_unit(
        wavelengths: Vec<f64>,
        flux: Vec<f64>,
        wavelength_unit: WavelengthUnit,
        unit: FluxUnit,
    ) -> Result<Self, SpectrumError> {
        let factor = wavelength_unit.to_angstrom();
        let wavelengths = wavelengths.into_iter().map(|w| w * factor).collect();
        Self::new(wavelengths, flux, unit)
    }

    /// Wavelength grid in Angstrom
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn unit(&self) -> FluxUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Always false; a spectrum holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// First and last wavelength of the grid in Angstrom
    pub fn range(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.len() - 1])
    }

    /// Iterate over (wavelength, flux) pairs
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths.iter().copied().zip(self.flux.iter().copied())
    }

    /// Flux at an arbitrary wavelength, linearly interpolated
    ///
    /// Returns 0.0 if the wavelength is outside the spectrum's range
    pub fn at(&self, wavelength: f64) -> f64 {
        let (lo, hi) = self.range();
        if wavelength < lo || wavelength > hi {
            return 0.0;
        }
        interp_unchecked(wavelength, &self.wavelengths, &self.flux)
    }

    /// Wavelength and flux of the brightest sample
    pub fn peak(&self) -> (f64, f64) {
        self.samples()
            .fold((self.wavelengths[0], self.flux[0]), |best, sample| {
                if sample.1 > best.1 {
                    sample
                } else {
                    best
                }
            })
    }

    /// Multiply by a throughput curve sampled on any grid.
    ///
    /// The curve is resampled onto this spectrum's grid; the grid itself is
    /// unchanged.
    pub fn multiply(mut self, curve: &ThroughputCurve) -> Self {
        for (w, f) in self.wavelengths.iter().zip(self.flux.iter_mut()) {
            *f *= curve.at(*w);
        }
        self
    }

    /// Apply a redshift: λ_observed = λ_emitted × (1+z).
    ///
    /// # Errors
    ///
    /// Returns an error if `z` is not finite or `z <= -1`.
    pub fn redshifted(mut self, z: f64, mode: RedshiftMode) -> Result<Self, SpectrumError> {
        if !z.is_finite() || z <= -1.0 {
            return Err(SpectrumError::InvalidRedshift(z));
        }

        let stretch = 1.0 + z;
        self.wavelengths.iter_mut().for_each(|w| *w *= stretch);
        if mode == RedshiftMode::ConserveFlux {
            self.flux.iter_mut().for_each(|f| *f /= stretch);
        }
        Ok(self)
    }

    /// Integrated flux over the whole grid (flux unit × Å)
    pub fn integrate(&self) -> Result<f64, SpectrumError> {
        Ok(trap_integrate(&self.wavelengths, &self.flux)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Spectrum {
        Spectrum::new(
            vec![1000.0, 2000.0, 3000.0, 4000.0],
            vec![1.0, 2.0, 3.0, 2.0],
            FluxUnit::Flam,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_grids() {
        assert!(matches!(
            Spectrum::new(vec![2.0, 1.0], vec![1.0, 1.0], FluxUnit::Flam),
            Err(SpectrumError::Grid(InterpError::UnsortedData))
        ));
        assert!(matches!(
            Spectrum::new(vec![0.0, 1.0], vec![1.0, 1.0], FluxUnit::Flam),
            Err(SpectrumError::NonPositiveWavelength(_))
        ));
        assert_eq!(
            Spectrum::new(vec![1.0, 2.0], vec![1.0, f64::NAN], FluxUnit::Flam)
                .unwrap_err()
                .to_string(),
            "Flux at sample 1 is not finite: NaN"
        );
    }

    #[test]
    fn test_interpolated_lookup() {
        let spectrum = ramp();
        assert_relative_eq!(spectrum.at(1500.0), 1.5, epsilon = 1e-12);
        assert_relative_eq!(spectrum.at(3500.0), 2.5, epsilon = 1e-12);
        assert_eq!(spectrum.at(500.0), 0.0);
        assert_eq!(spectrum.at(5000.0), 0.0);
    }

    #[test]
    fn test_peak() {
        assert_eq!(ramp().peak(), (3000.0, 3.0));
    }

    #[test]
    fn test_multiply_resamples_curve() {
        let curve = ThroughputCurve::from_table(vec![1500.0, 3500.0], vec![0.5, 1.0]).unwrap();
        let attenuated = ramp().multiply(&curve);

        assert_eq!(attenuated.wavelengths(), &[1000.0, 2000.0, 3000.0, 4000.0]);
        // Outside the curve's coverage the product is zero
        assert_eq!(attenuated.flux()[0], 0.0);
        assert_relative_eq!(attenuated.flux()[1], 2.0 * 0.625, epsilon = 1e-12);
        assert_relative_eq!(attenuated.flux()[2], 3.0 * 0.875, epsilon = 1e-12);
        assert_eq!(attenuated.flux()[3], 0.0);
    }

    #[test]
    fn test_redshift_wavelength_only() {
        let shifted = ramp().redshifted(1.0, RedshiftMode::WavelengthOnly).unwrap();
        assert_eq!(shifted.wavelengths(), &[2000.0, 4000.0, 6000.0, 8000.0]);
        assert_eq!(shifted.flux(), ramp().flux());
    }

    #[test]
    fn test_redshift_conserve_flux() {
        let original = ramp();
        let shifted = ramp().redshifted(0.5, RedshiftMode::ConserveFlux).unwrap();
        assert_relative_eq!(shifted.flux()[2], 2.0, epsilon = 1e-12);
        // Integrated flux is preserved
        assert_relative_eq!(
            shifted.integrate().unwrap(),
            original.integrate().unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_invalid_redshift() {
        assert_eq!(
            ramp().redshifted(-1.0, RedshiftMode::WavelengthOnly),
            Err(SpectrumError::InvalidRedshift(-1.0))
        );
    }

    #[test]
    fn test_wavelength_units() {
        assert_eq!("um".parse::<WavelengthUnit>().unwrap(), WavelengthUnit::Micron);
        assert_eq!("Angstrom".parse::<WavelengthUnit>().unwrap(), WavelengthUnit::Angstrom);
        assert_eq!("".parse::<WavelengthUnit>().unwrap(), WavelengthUnit::Angstrom);
        assert!("furlong".parse::<WavelengthUnit>().is_err());

        let spectrum = Spectrum::with_wavelength_unit(
            vec![0.5, 1.0],
            vec![1.0, 1.0],
            WavelengthUnit::Micron,
            FluxUnit::Normalized,
        )
        .unwrap();
        assert_eq!(spectrum.range(), (5000.0, 10000.0));
    }

    #[test]
    fn test_flux_units() {
        assert_eq!("FLAM".parse::<FluxUnit>().unwrap(), FluxUnit::Flam);
        assert_eq!("erg/s/cm^2/A".parse::<FluxUnit>().unwrap(), FluxUnit::Flam);
        assert_eq!("erg s-1 cm-2 Angstrom-1".parse::<FluxUnit>().unwrap(), FluxUnit::Flam);
        assert_eq!("erg/s/cm2/A/sr".parse::<FluxUnit>().unwrap(), FluxUnit::FlamPerSteradian);
        assert_eq!("normalized".parse::<FluxUnit>().unwrap(), FluxUnit::Normalized);
        assert!(matches!(
            "Jy".parse::<FluxUnit>(),
            Err(SpectrumError::UnknownFluxUnit(_))
        ));
    }
}

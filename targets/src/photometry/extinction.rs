//! Interstellar extinction curves
//!
//! The attenuation applied to a spectrum is stitched from two parametric
//! reddening laws, selected per sample with a hard cutoff at 2.7 µm:
//!
//! - **Fitzpatrick (1999)** for λ ≤ 2.7 µm: FM90 ultraviolet parametrization
//!   joined to a cubic spline through optical/infrared anchor points
//! - **Gordon et al. (2023)** for λ > 2.7 µm: the near/mid infrared branch, two
//!   power laws with a smooth transition plus the 10 µm and 20 µm silicate
//!   features
//!
//! There is no blending across the cutoff, so the curve generally jumps there.
//! Throughput is `10^(-0.4 A(λ))` with `A(λ) = A_V × A(λ)/A(V)`.

use std::fmt;

use thiserror::Error;

use super::spectrum::ANGSTROM_PER_MICRON;
use super::throughput::{ThroughputCurve, ThroughputError};
use crate::algo::spline::{CubicSpline, SplineError};

/// Ratio of total to selective extinction used when none is given
pub const DEFAULT_RV: f64 = 3.1;

/// Wavelengths at or below this (in micron) use the short-wavelength law
pub const LAW_BREAKPOINT_MICRON: f64 = 2.7;

#[derive(Debug, Error)]
pub enum ExtinctionError {
    #[error("{law} is valid for wavelengths in [{min_um}, {max_um}] micron, got {wavelength_um}")]
    WavelengthOutOfRange {
        law: ReddeningLaw,
        wavelength_um: f64,
        min_um: f64,
        max_um: f64,
    },

    #[error("{law} is valid for R_V in [{min}, {max}], got {r_v}")]
    RvOutOfRange {
        law: ReddeningLaw,
        r_v: f64,
        min: f64,
        max: f64,
    },

    #[error("A_V must be finite, got {0}")]
    InvalidAv(f64),

    #[error("Failed to build {0} spline: {1}")]
    Spline(ReddeningLaw, SplineError),

    #[error("Invalid attenuation curve: {0}")]
    Throughput(#[from] ThroughputError),
}

/// The parametric laws stitched into the extinction curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReddeningLaw {
    Fitzpatrick99,
    Gordon23,
}

impl fmt::Display for ReddeningLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReddeningLaw::Fitzpatrick99 => write!(f, "F99"),
            ReddeningLaw::Gordon23 => write!(f, "G23"),
        }
    }
}

impl ReddeningLaw {
    /// Law applied to a sample at the given wavelength
    pub fn for_wavelength(wavelength_um: f64) -> Self {
        if wavelength_um <= LAW_BREAKPOINT_MICRON {
            ReddeningLaw::Fitzpatrick99
        } else {
            ReddeningLaw::Gordon23
        }
    }

    /// Wavelength validity range in micron
    pub fn wavelength_range_um(self) -> (f64, f64) {
        match self {
            ReddeningLaw::Fitzpatrick99 => (1.0 / 10.0, 1.0 / 0.3),
            ReddeningLaw::Gordon23 => (0.0912, 32.0),
        }
    }

    /// R_V validity range
    pub fn rv_range(self) -> (f64, f64) {
        match self {
            ReddeningLaw::Fitzpatrick99 => (2.0, 6.0),
            ReddeningLaw::Gordon23 => (2.3, 5.6),
        }
    }

    fn check_rv(self, r_v: f64) -> Result<(), ExtinctionError> {
        let (min, max) = self.rv_range();
        if !(min..=max).contains(&r_v) {
            return Err(ExtinctionError::RvOutOfRange {
                law: self,
                r_v,
                min,
                max,
            });
        }
        Ok(())
    }

    fn check_wavelength(self, wavelength_um: f64) -> Result<(), ExtinctionError> {
        let (min_um, max_um) = self.wavelength_range_um();
        // Compare in inverse micron, the unit the laws define their range in
        let x = 1.0 / wavelength_um;
        if !wavelength_um.is_finite() || x < 1.0 / max_um - 1e-12 || x > 1.0 / min_um + 1e-12 {
            return Err(ExtinctionError::WavelengthOutOfRange {
                law: self,
                wavelength_um,
                min_um,
                max_um,
            });
        }
        Ok(())
    }
}

/// FM90 ultraviolet extinction, E(λ-V)/E(B-V)
fn fm90(x: f64, c1: f64, c2: f64, c3: f64, c4: f64, x0: f64, gamma: f64) -> f64 {
    let x2 = x * x;
    let drude = x2 / ((x2 - x0 * x0).powi(2) + x2 * gamma * gamma);
    let far_uv = if x >= 5.9 {
        let d = x - 5.9;
        0.5392 * d * d + 0.05644 * d * d * d
    } else {
        0.0
    };
    c1 + c2 * x + c3 * drude + c4 * far_uv
}

/// Fitzpatrick (1999) law prepared for one R_V
struct Fitzpatrick99 {
    r_v: f64,
    c1: f64,
    c2: f64,
    spline: CubicSpline,
}

impl Fitzpatrick99 {
    const X0: f64 = 4.596;
    const GAMMA: f64 = 0.99;
    const C3: f64 = 3.23;
    const C4: f64 = 0.41;

    /// Inverse micron above which the FM90 form is used directly
    const X_UV_CUT: f64 = 1.0 / 0.27;

    fn new(r_v: f64) -> Result<Self, ExtinctionError> {
        ReddeningLaw::Fitzpatrick99.check_rv(r_v)?;

        let c2 = -0.824 + 4.717 / r_v;
        let c1 = 2.030 - 3.007 * c2;

        let uv_anchor = |x: f64| fm90(x, c1, c2, Self::C3, Self::C4, Self::X0, Self::GAMMA) + r_v;
        let xs = vec![
            0.0,
            1.0 / 2.65,
            1.0 / 1.22,
            1.0 / 0.600,
            1.0 / 0.547,
            1.0 / 0.467,
            1.0 / 0.411,
            1.0 / 0.27,
            1.0 / 0.26,
        ];
        let ys = vec![
            0.0,
            0.265 * r_v / 3.1,
            0.829 * r_v / 3.1,
            -0.426 + 1.0044 * r_v,
            -0.050 + 1.0016 * r_v,
            0.701 + 1.0016 * r_v,
            1.208 + 1.0032 * r_v - 0.00033 * r_v * r_v,
            uv_anchor(1.0 / 0.27),
            uv_anchor(1.0 / 0.26),
        ];
        let spline = CubicSpline::not_a_knot(xs, ys)
            .map_err(|e| ExtinctionError::Spline(ReddeningLaw::Fitzpatrick99, e))?;

        Ok(Self { r_v, c1, c2, spline })
    }

    /// A(λ)/A(V) at a wavelength in micron
    fn a_over_av(&self, wavelength_um: f64) -> Result<f64, ExtinctionError> {
        ReddeningLaw::Fitzpatrick99.check_wavelength(wavelength_um)?;
        let x = 1.0 / wavelength_um;

        let a_over_ebv = if x >= Self::X_UV_CUT {
            fm90(x, self.c1, self.c2, Self::C3, Self::C4, Self::X0, Self::GAMMA) + self.r_v
        } else {
            self.spline.eval(x)
        };
        Ok(a_over_ebv / self.r_v)
    }
}

/// Asymmetric Drude profile used for the silicate features
fn drude_asym(wave: f64, amplitude: f64, center: f64, fwhm: f64, asym: f64) -> f64 {
    let gamma = 2.0 * fwhm / (1.0 + (asym * (wave - center)).exp());
    let g = gamma / center;
    amplitude * g * g / ((wave / center - center / wave).powi(2) + g * g)
}

/// Gordon et al. (2023) near/mid infrared branch prepared for one R_V
struct Gordon23 {
    r_v: f64,
}

impl Gordon23 {
    // Intercept term: two power laws joined at SWAVE, then two silicate features
    const SCALE: f64 = 0.38526;
    const ALPHA1: f64 = 1.68467;
    const ALPHA2: f64 = 0.78791;
    const SWAVE: f64 = 4.30578;
    const SWIDTH: f64 = 4.78338;
    const SIL1: (f64, f64, f64, f64) = (0.06652, 9.8434, 2.21205, -0.24703);
    const SIL2: (f64, f64, f64, f64) = (0.0267, 19.58294, 17.0, -0.27);

    // Slope term: B_SCALE × λ^B_EXPONENT
    const B_SCALE: f64 = -1.01251;
    const B_EXPONENT: f64 = -1.06099;

    fn new(r_v: f64) -> Result<Self, ExtinctionError> {
        ReddeningLaw::Gordon23.check_rv(r_v)?;
        Ok(Self { r_v })
    }

    fn intercept(wave: f64) -> f64 {
        let first = Self::SCALE * wave.powf(-Self::ALPHA1);
        let norm = Self::SWAVE.powf(-Self::ALPHA1) / Self::SWAVE.powf(-Self::ALPHA2);
        let second = Self::SCALE * norm * wave.powf(-Self::ALPHA2);

        let weight = 1.0 / (1.0 + (-(wave - Self::SWAVE) / Self::SWIDTH).exp());
        let (a1, c1, w1, s1) = Self::SIL1;
        let (a2, c2, w2, s2) = Self::SIL2;

        first * (1.0 - weight)
            + second * weight
            + drude_asym(wave, a1, c1, w1, s1)
            + drude_asym(wave, a2, c2, w2, s2)
    }

    /// A(λ)/A(V) at a wavelength in micron
    fn a_over_av(&self, wavelength_um: f64) -> Result<f64, ExtinctionError> {
        ReddeningLaw::Gordon23.check_wavelength(wavelength_um)?;
        let slope = Self::B_SCALE * wavelength_um.powf(Self::B_EXPONENT);
        Ok(Self::intercept(wavelength_um) + slope * (1.0 / self.r_v - 1.0 / DEFAULT_RV))
    }
}

/// Extinction parameters applied to a spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extinction {
    /// Total V-band extinction in magnitudes
    pub a_v: f64,

    /// Ratio of total to selective extinction
    pub r_v: f64,
}

impl Extinction {
    /// Extinction with the default R_V of 3.1
    pub fn new(a_v: f64) -> Self {
        Self { a_v, r_v: DEFAULT_RV }
    }

    pub fn with_r_v(a_v: f64, r_v: f64) -> Self {
        Self { a_v, r_v }
    }

    /// A(λ) in magnitudes for each wavelength in Angstrom.
    ///
    /// Samples at or below 2.7 µm go through F99, the rest through G23; the
    /// two partial results are written back in input order.
    pub fn a_lambda(&self, wavelengths_aa: &[f64]) -> Result<Vec<f64>, ExtinctionError> {
        if !self.a_v.is_finite() {
            return Err(ExtinctionError::InvalidAv(self.a_v));
        }

        let microns: Vec<f64> = wavelengths_aa
            .iter()
            .map(|w| w / ANGSTROM_PER_MICRON)
            .collect();
        let (short, long): (Vec<usize>, Vec<usize>) = (0..microns.len())
            .partition(|&i| ReddeningLaw::for_wavelength(microns[i]) == ReddeningLaw::Fitzpatrick99);

        let mut a_lambda = vec![0.0; microns.len()];
        if !short.is_empty() {
            let law = Fitzpatrick99::new(self.r_v)?;
            for i in short {
                a_lambda[i] = law.a_over_av(microns[i])? * self.a_v;
            }
        }
        if !long.is_empty() {
            let law = Gordon23::new(self.r_v)?;
            for i in long {
                a_lambda[i] = law.a_over_av(microns[i])? * self.a_v;
            }
        }

        Ok(a_lambda)
    }

    /// Fractional transmission 10^(-0.4 A(λ)) for each wavelength in Angstrom
    pub fn transmission(&self, wavelengths_aa: &[f64]) -> Result<Vec<f64>, ExtinctionError> {
        Ok(self
            .a_lambda(wavelengths_aa)?
            .into_iter()
            .map(|a| 10f64.powf(-0.4 * a))
            .collect())
    }

    /// Attenuation as a throughput curve on the given grid
    pub fn curve(&self, wavelengths_aa: &[f64]) -> Result<ThroughputCurve, ExtinctionError> {
        let transmission = self.transmission(wavelengths_aa)?;
        Ok(ThroughputCurve::from_table(
            wavelengths_aa.to_vec(),
            transmission,
        )?)
    }
}

/// A(λ)/A(V) for a single wavelength in micron, using the law selected for it
pub fn relative_extinction(wavelength_um: f64, r_v: f64) -> Result<f64, ExtinctionError> {
    match ReddeningLaw::for_wavelength(wavelength_um) {
        ReddeningLaw::Fitzpatrick99 => Fitzpatrick99::new(r_v)?.a_over_av(wavelength_um),
        ReddeningLaw::Gordon23 => Gordon23::new(r_v)?.a_over_av(wavelength_um),
    }
}

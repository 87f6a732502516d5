//! Sérsic surface-brightness profiles
//!
//! I(r) = exp(-b_n ((r / r_e)^(1/n) - 1)) with the analytic approximation
//! b_n = 2n - 1/3. The image is evaluated at pixel centers on an elliptical
//! radius and normalized to unit total flux.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::image::{FluxImage, PixelGrid, SERSIC_EXTNAME};
use super::MorphologyError;

/// Upper bound (exclusive) on ellipticity
pub const MAX_ELLIPTICITY: f64 = 0.95;

pub const DEFAULT_INDEX: f64 = 1.0;
pub const DEFAULT_RADIUS: f64 = 0.5;

fn default_index() -> f64 {
    DEFAULT_INDEX
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

/// Sérsic shape as given in a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SersicParams {
    /// Sérsic index n
    #[serde(default = "default_index")]
    pub index: f64,

    /// Effective radius r_e in arcseconds
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// 1 - b/a
    #[serde(default)]
    pub ellipticity: Option<f64>,

    /// Position angle in degrees
    #[serde(default)]
    pub angle: Option<f64>,
}

impl Default for SersicParams {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX,
            radius: DEFAULT_RADIUS,
            ellipticity: None,
            angle: None,
        }
    }
}

impl SersicParams {
    pub fn new(index: f64, radius: f64) -> Result<Self, MorphologyError> {
        let params = Self {
            index,
            radius,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_shape(mut self, ellipticity: f64, angle: f64) -> Self {
        self.ellipticity = Some(ellipticity);
        self.angle = Some(angle);
        self
    }

    /// Check the index and radius. Ellipticity is checked once overrides are applied.
    pub fn validate(&self) -> Result<(), MorphologyError> {
        for (name, value) in [("index", self.index), ("radius", self.radius)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MorphologyError::InvalidSersic { name, value });
            }
        }
        Ok(())
    }

    /// b_n = 2n - 1/3
    pub fn b_n(&self) -> f64 {
        2.0 * self.index - 1.0 / 3.0
    }

    /// Natural log of the unnormalized surface brightness at elliptical radius `r`
    fn log_intensity(&self, r: f64) -> f64 {
        -self.b_n() * ((r / self.radius).powf(1.0 / self.index) - 1.0)
    }
}

impl fmt::Display for SersicParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={} r_e={}", self.index, self.radius)
    }
}

/// Largest exponent whose `exp` is finite
const MAX_EXPONENT: f64 = 709.782712893384;

/// Render a normalized Sérsic image
///
/// # Arguments
///
/// * `params` - Index and radius from the descriptor
/// * `grid` - Sampling grid
/// * `ellipticity` - Resolved ellipticity in [0, 0.95)
/// * `angle_deg` - Resolved position angle in degrees
///
/// # Errors
///
/// Returns [`MorphologyError::EllipticityOutOfRange`] for an ellipticity
/// outside [0, 0.95) and [`MorphologyError::DegenerateProfile`] when the
/// profile cannot be normalized.
pub fn render_sersic(
    params: &SersicParams,
    grid: &PixelGrid,
    ellipticity: f64,
    angle_deg: f64,
) -> Result<FluxImage, MorphologyError> {
    params.validate()?;
    if !(0.0..MAX_ELLIPTICITY).contains(&ellipticity) {
        return Err(MorphologyError::EllipticityOutOfRange(ellipticity));
    }
    if !angle_deg.is_finite() {
        return Err(MorphologyError::InvalidAngle(angle_deg));
    }

    let n = grid.npix();
    let axis = grid.axis();
    let (sin_t, cos_t) = angle_deg.to_radians().sin_cos();
    let q = 1.0 - ellipticity;

    // Rows follow y, columns follow x
    let exponents = Array2::from_shape_fn((n, n), |(row, col)| {
        let x = axis[col];
        let y = axis[row];
        let x_rot = x * cos_t + y * sin_t;
        let y_rot = -x * sin_t + y * cos_t;
        let r = (x_rot * x_rot + (y_rot / q).powi(2)).sqrt();
        let exponent = params.log_intensity(r);
        // Terms that would overflow carry no usable flux
        if exponent.is_finite() && exponent <= MAX_EXPONENT {
            exponent
        } else {
            f64::NEG_INFINITY
        }
    });

    // Scale by the brightest pixel so the sum cannot overflow
    let peak = exponents.fold(f64::NEG_INFINITY, |acc, &e| acc.max(e));
    if peak == f64::NEG_INFINITY {
        return Err(MorphologyError::DegenerateProfile(0.0));
    }
    let mut data = exponents.mapv(|e| (e - peak).exp());

    let total = data.sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(MorphologyError::DegenerateProfile(total));
    }
    data /= total;

    Ok(FluxImage::new(
        data,
        SERSIC_EXTNAME,
        vec![
            ("SINDEX", params.index),
            ("SRADIUS", params.radius),
            ("PIXSCALE", grid.pixel_scale()),
            ("FOV_DIAM", grid.fov_diameter()),
            ("ELLIPTIC", ellipticity),
            ("ANGLE", angle_deg),
        ],
    ))
}

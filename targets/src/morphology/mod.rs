//! Spatial models of a target
//!
//! A [`MorphologyDescriptor`] is parsed once from the request and turned into
//! a [`SpatialProduct`] on demand:
//! - point sources become a [`PointTable`]
//! - a uniform infinite source becomes a flat [`FluxImage`]
//! - a Sérsic profile becomes a [`FluxImage`] normalized to unit flux
//!
//! Sampling parameters come from a [`FieldRequest`] which also carries
//! call-time overrides. Overrides win over descriptor values, which win over
//! documented defaults.

pub mod image;
pub mod point;
pub mod sersic;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use image::{FluxImage, PixelGrid};
pub use point::{PointColumns, PointSource, PointTable};
pub use sersic::SersicParams;

/// Errors raised while parsing or synthesizing a morphology
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MorphologyError {
    #[error("Unknown morphologytype: {0}")]
    UnknownMorphologyType(String),

    #[error("Unknown extendedtype: {0}")]
    UnknownExtendedType(String),

    #[error("Invalid morphology descriptor: {0}")]
    Descriptor(String),

    #[error("Both 'x' and 'y' must be provided together.")]
    MissingCoordinate,

    #[error("Length mismatch: '{field}' has length {actual}, expected {expected}.")]
    LengthMismatch {
        field: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("pixel_scale and fov_diameter must be provided for extended sources")]
    MissingGrid,

    #[error("{name} must be finite and positive, got {value}")]
    InvalidGrid { name: &'static str, value: f64 },

    #[error("Grid of {side} pixels per side exceeds the maximum of {max}")]
    GridTooLarge { side: f64, max: usize },

    #[error("Sersic {name} must be finite and positive, got {value}")]
    InvalidSersic { name: &'static str, value: f64 },

    #[error("ellipticity must be in [0, 0.95), got {0}")]
    EllipticityOutOfRange(f64),

    #[error("angle must be finite, got {0}")]
    InvalidAngle(f64),

    #[error("Sersic profile cannot be normalized, pixel sum is {0}")]
    DegenerateProfile(f64),
}

/// Sampling parameters and call-time overrides for one synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRequest {
    /// Arcseconds per pixel
    #[serde(default)]
    pub pixel_scale: Option<f64>,

    /// Field of view diameter in arcseconds
    #[serde(default)]
    pub fov_diameter: Option<f64>,

    #[serde(default)]
    pub ellipticity: Option<f64>,

    /// Degrees
    #[serde(default)]
    pub angle: Option<f64>,

    /// Point columns replacing those of the descriptor, column by column
    #[serde(default)]
    pub points: PointColumns,
}

impl FieldRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request sampled at `pixel_scale` over `fov_diameter`
    pub fn sampled(pixel_scale: f64, fov_diameter: f64) -> Self {
        Self {
            pixel_scale: Some(pixel_scale),
            fov_diameter: Some(fov_diameter),
            ..Default::default()
        }
    }

    pub fn with_shape(mut self, ellipticity: f64, angle: f64) -> Self {
        self.ellipticity = Some(ellipticity);
        self.angle = Some(angle);
        self
    }

    pub fn with_points(mut self, points: PointColumns) -> Self {
        self.points = points;
        self
    }

    fn grid(&self) -> Result<PixelGrid, MorphologyError> {
        PixelGrid::new(self.pixel_scale, self.fov_diameter)
    }
}

/// The spatial half of a source model
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialProduct {
    Points(PointTable),
    Image(FluxImage),
}

impl SpatialProduct {
    pub fn as_points(&self) -> Option<&PointTable> {
        match self {
            SpatialProduct::Points(table) => Some(table),
            SpatialProduct::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&FluxImage> {
        match self {
            SpatialProduct::Image(image) => Some(image),
            SpatialProduct::Points(_) => None,
        }
    }
}

/// Parsed shape of a target
#[derive(Debug, Clone, PartialEq)]
pub enum MorphologyDescriptor {
    Point(PointColumns),
    InfiniteExtended,
    Sersic(SersicParams),
}

/// Render a dispatch tag the way it appeared in the request
fn tag_repr(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, MorphologyError> {
    T::deserialize(value).map_err(|e| MorphologyError::Descriptor(e.to_string()))
}

impl MorphologyDescriptor {
    /// Parse a morphology object such as
    /// `{"morphologytype": "extended", "extendedtype": "sersic", "index": 4}`
    ///
    /// # Errors
    ///
    /// Returns an error for unknown dispatch tags, wrongly typed fields, or
    /// a non-positive Sérsic index or radius.
    pub fn from_json(value: &Value) -> Result<Self, MorphologyError> {
        let morph_type = value.get("morphologytype");
        let descriptor = match morph_type.and_then(Value::as_str) {
            Some("point") => MorphologyDescriptor::Point(from_value(value)?),
            Some("extended") => {
                let ext_type = value.get("extendedtype");
                match ext_type.and_then(Value::as_str) {
                    Some("infinite") => MorphologyDescriptor::InfiniteExtended,
                    Some("sersic") => {
                        let params: SersicParams = from_value(value)?;
                        params.validate()?;
                        MorphologyDescriptor::Sersic(params)
                    }
                    _ => return Err(MorphologyError::UnknownExtendedType(tag_repr(ext_type))),
                }
            }
            _ => return Err(MorphologyError::UnknownMorphologyType(tag_repr(morph_type))),
        };
        debug!("Parsed morphology descriptor: {}", descriptor.kind());
        Ok(descriptor)
    }

    /// Short label for logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            MorphologyDescriptor::Point(_) => "point",
            MorphologyDescriptor::InfiniteExtended => "infinite extended",
            MorphologyDescriptor::Sersic(_) => "sersic",
        }
    }

    /// Produce the spatial product for this shape
    ///
    /// Point sources ignore the sampling fields of `request`. Extended
    /// sources require both `pixel_scale` and `fov_diameter`.
    pub fn synthesize(&self, request: &FieldRequest) -> Result<SpatialProduct, MorphologyError> {
        match self {
            MorphologyDescriptor::Point(columns) => {
                let table = columns.merged(&request.points).resolve()?;
                debug!("Resolved {} point source(s)", table.len());
                Ok(SpatialProduct::Points(table))
            }
            MorphologyDescriptor::InfiniteExtended => {
                let grid = request.grid()?;
                debug!("Rendering uniform field on {0}x{0} grid", grid.npix());
                Ok(SpatialProduct::Image(image::render_infinite(&grid)))
            }
            MorphologyDescriptor::Sersic(params) => {
                let grid = request.grid()?;
                let ellipticity = request.ellipticity.or(params.ellipticity).unwrap_or(0.0);
                let angle = request.angle.or(params.angle).unwrap_or(0.0);
                debug!(
                    "Rendering Sersic {} e={} angle={} on {npix}x{npix} grid",
                    params,
                    ellipticity,
                    angle,
                    npix = grid.npix(),
                );
                let image = sersic::render_sersic(params, &grid, ellipticity, angle)?;
                Ok(SpatialProduct::Image(image))
            }
        }
    }
}

//! Pixel grids and flux images for extended sources
//!
//! Angles on the sky are in arcseconds. Grids are square with an odd side so
//! that the central pixel sits exactly on the source center.

use ndarray::Array2;

use super::MorphologyError;

/// Largest grid side accepted, in pixels
pub const MAX_GRID_SIDE: usize = 8191;

/// Extension name of the uniform infinite-source image
pub const INFINITE_EXTNAME: &str = "INFINITE_EXTENDED";

/// Extension name of the Sérsic profile image
pub const SERSIC_EXTNAME: &str = "SERSIC_MODEL";

/// Square sampling grid centered on the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    npix: usize,
    pixel_scale: f64,
    fov_diameter: f64,
}

impl PixelGrid {
    /// Build the grid covering `fov_diameter` at `pixel_scale`
    ///
    /// The side is `ceil(fov_diameter / pixel_scale)`, incremented by one when
    /// even.
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::MissingGrid`] if either value is absent and
    /// [`MorphologyError::InvalidGrid`] if either is not finite and positive.
    pub fn new(pixel_scale: Option<f64>, fov_diameter: Option<f64>) -> Result<Self, MorphologyError> {
        let (Some(pixel_scale), Some(fov_diameter)) = (pixel_scale, fov_diameter) else {
            return Err(MorphologyError::MissingGrid);
        };

        for (name, value) in [("pixel_scale", pixel_scale), ("fov_diameter", fov_diameter)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MorphologyError::InvalidGrid { name, value });
            }
        }

        let side = (fov_diameter / pixel_scale).ceil();
        if side > MAX_GRID_SIDE as f64 {
            return Err(MorphologyError::GridTooLarge {
                side,
                max: MAX_GRID_SIDE,
            });
        }

        let mut npix = (side as usize).max(1);
        if npix % 2 == 0 {
            npix += 1;
        }

        Ok(Self {
            npix,
            pixel_scale,
            fov_diameter,
        })
    }

    /// Pixels per side, always odd
    pub fn npix(&self) -> usize {
        self.npix
    }

    pub fn pixel_scale(&self) -> f64 {
        self.pixel_scale
    }

    pub fn fov_diameter(&self) -> f64 {
        self.fov_diameter
    }

    /// Index of the central row and column
    pub fn center(&self) -> usize {
        self.npix / 2
    }

    /// Pixel-center offsets from the grid center in arcseconds
    pub fn axis(&self) -> Vec<f64> {
        let center = self.center() as f64;
        (0..self.npix)
            .map(|i| (i as f64 - center) * self.pixel_scale)
            .collect()
    }
}

/// A 2-D flux image with FITS-style header keywords attached.
///
/// Rows run along y and columns along x. The keywords describe how the image
/// was made and never alter pixel values.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxImage {
    data: Array2<f64>,
    extname: &'static str,
    keywords: Vec<(&'static str, f64)>,
}

impl FluxImage {
    pub fn new(data: Array2<f64>, extname: &'static str, keywords: Vec<(&'static str, f64)>) -> Self {
        Self {
            data,
            extname,
            keywords,
        }
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_data(self) -> Array2<f64> {
        self.data
    }

    /// FITS extension name a serializer should use
    pub fn extname(&self) -> &'static str {
        self.extname
    }

    /// Header keywords in insertion order
    pub fn keywords(&self) -> &[(&'static str, f64)] {
        &self.keywords
    }

    pub fn keyword(&self, name: &str) -> Option<f64> {
        self.keywords
            .iter()
            .find(|(key, _)| *key == name)
            .map(|&(_, value)| value)
    }

    pub fn npix(&self) -> usize {
        self.data.nrows()
    }

    pub fn pixel_scale(&self) -> Option<f64> {
        self.keyword("PIXSCALE")
    }

    pub fn fov_diameter(&self) -> Option<f64> {
        self.keyword("FOV_DIAM")
    }

    pub fn sum(&self) -> f64 {
        self.data.sum()
    }
}

/// Uniform surface brightness filling the field.
///
/// Each pixel holds `pixel_scale²` so that any one square arcsecond carries
/// unit flux regardless of sampling.
pub fn render_infinite(grid: &PixelGrid) -> FluxImage {
    let n = grid.npix();
    let pixel_flux = grid.pixel_scale() * grid.pixel_scale();
    let data = Array2::from_elem((n, n), pixel_flux);

    FluxImage::new(
        data,
        INFINITE_EXTNAME,
        vec![
            ("PIXSCALE", grid.pixel_scale()),
            ("FOV_DIAM", grid.fov_diameter()),
        ],
    )
}

//! Test fixtures for the target model engine.
//!
//! Provides two things:
//! - workspace path lookup, for tests that read the sample descriptors under
//!   `demos/`
//! - [`TemplateFixture`], a temporary templates root populated with small FITS
//!   spectra laid out the way the catalogs expect
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_helpers::{FixtureSpectrum, TemplateFixture};
//!
//! let fixture = TemplateFixture::new().unwrap();
//! fixture
//!     .write_template("Kurucz", "G2V.fits", &FixtureSpectrum::default())
//!     .unwrap();
//! assert!(fixture.root().join("Kurucz/G2V.fits").exists());
//! ```

use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;
use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No `Cargo.toml` with a `[workspace]` section above the current directory
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),

    #[error("Fixture I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write FITS fixture: {0}")]
    Fits(#[from] fitsio::errors::Error),
}

/// Walk up from the current directory to the workspace root
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Path to a sample target descriptor shipped in `demos/`
pub fn demo_descriptor<P: AsRef<Path>>(name: P) -> PathBuf {
    PROJECT_ROOT.join("demos").join(name)
}

/// Columns written to a fixture template
#[derive(Debug, Clone)]
pub struct FixtureSpectrum {
    pub wavelength_column: String,
    pub flux_column: String,
    /// Written as `TUNIT1` when set
    pub wavelength_unit: Option<String>,
    /// Written as `TUNIT2` when set
    pub flux_unit: Option<String>,
    pub wavelengths: Vec<f64>,
    pub flux: Vec<f64>,
}

impl Default for FixtureSpectrum {
    /// A smooth bump over 3000-11000 Angstrom in 81 samples
    fn default() -> Self {
        let wavelengths: Vec<f64> = (0..81).map(|i| 3000.0 + 100.0 * i as f64).collect();
        let flux = wavelengths
            .iter()
            .map(|w| {
                let d = (w - 6000.0) / 1500.0;
                1e-14 * (-0.5 * d * d).exp()
            })
            .collect();
        Self {
            wavelength_column: "WAVELENGTH".to_string(),
            flux_column: "FLUX".to_string(),
            wavelength_unit: Some("ANGSTROMS".to_string()),
            flux_unit: None,
            wavelengths,
            flux,
        }
    }
}

impl FixtureSpectrum {
    pub fn with_columns(mut self, wavelength: &str, flux: &str) -> Self {
        self.wavelength_column = wavelength.to_string();
        self.flux_column = flux.to_string();
        self
    }

    pub fn with_unit(mut self, unit: Option<&str>) -> Self {
        self.wavelength_unit = unit.map(str::to_string);
        self
    }

    pub fn with_flux_unit(mut self, unit: &str) -> Self {
        self.flux_unit = Some(unit.to_string());
        self
    }

    /// Express the same grid in another unit, `factor` Angstrom per unit
    pub fn in_unit(mut self, unit: &str, factor: f64) -> Self {
        self.wavelengths.iter_mut().for_each(|w| *w /= factor);
        self.wavelength_unit = Some(unit.to_string());
        self
    }
}

/// A temporary templates root, removed on drop
pub struct TemplateFixture {
    dir: TempDir,
}

impl TemplateFixture {
    pub fn new() -> Result<Self, TestHelperError> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `spectrum` as a binary table to `<root>/<catalog_dir>/<file_name>`
    pub fn write_template(
        &self,
        catalog_dir: &str,
        file_name: &str,
        spectrum: &FixtureSpectrum,
    ) -> Result<PathBuf, TestHelperError> {
        let dir = self.root().join(catalog_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);

        let mut fptr = FitsFile::create(&path).open()?;
        let wave = ColumnDescription::new(&spectrum.wavelength_column)
            .with_type(ColumnDataType::Double)
            .create()?;
        let flux = ColumnDescription::new(&spectrum.flux_column)
            .with_type(ColumnDataType::Double)
            .create()?;
        let hdu = fptr.create_table("SPECTRUM".to_string(), &[wave, flux])?;
        hdu.write_col(&mut fptr, &spectrum.wavelength_column, &spectrum.wavelengths)?;
        hdu.write_col(&mut fptr, &spectrum.flux_column, &spectrum.flux)?;
        if let Some(unit) = &spectrum.wavelength_unit {
            hdu.write_key(&mut fptr, "TUNIT1", unit.as_str())?;
        }
        if let Some(unit) = &spectrum.flux_unit {
            hdu.write_key(&mut fptr, "TUNIT2", unit.as_str())?;
        }

        Ok(path)
    }

    /// Write a file with the right name that is not FITS
    pub fn write_garbage(&self, catalog_dir: &str, file_name: &str) -> Result<PathBuf, TestHelperError> {
        let dir = self.root().join(catalog_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, b"this is not a FITS file")?;
        Ok(path)
    }
}

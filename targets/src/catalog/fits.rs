//! FITS template reader
//!
//! Templates are binary tables in the first extension with a wavelength and a
//! flux column. Column names are matched case-insensitively and the
//! units are taken from the matching `TUNITn` keywords, defaulting to Angstrom
//! and FLAM when absent.

use std::path::Path;

use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::FitsFile;
use log::debug;

use super::CatalogError;
use crate::photometry::{FluxUnit, Spectrum, WavelengthUnit};

pub const WAVELENGTH_COLUMN: &str = "WAVELENGTH";
pub const FLUX_COLUMN: &str = "FLUX";

/// Wrap a fitsio call with the template path
fn fits_err(path: &Path) -> impl FnOnce(fitsio::errors::Error) -> CatalogError + '_ {
    move |e| CatalogError::Fits {
        path: path.to_path_buf(),
        source: Box::new(e),
    }
}

fn malformed(path: &Path, reason: impl Into<String>) -> CatalogError {
    CatalogError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Index and exact name of a column, matched case-insensitively
fn find_column(columns: &[String], wanted: &str) -> Option<(usize, String)> {
    columns
        .iter()
        .enumerate()
        .find(|(_, name)| name.trim().eq_ignore_ascii_case(wanted))
        .map(|(i, name)| (i, name.clone()))
}

fn column_unit(
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    index: usize,
) -> Option<String> {
    // TUNITn is 1-indexed
    hdu.read_key::<String>(fptr, &format!("TUNIT{}", index + 1))
        .ok()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
}

/// Read a template spectrum from `path`
///
/// # Errors
///
/// Returns [`CatalogError::Fits`] if cfitsio cannot open or read the file and
/// [`CatalogError::Malformed`] if the table lacks the expected columns or its
/// samples do not form a valid spectrum.
pub fn read_template(path: &Path) -> Result<Spectrum, CatalogError> {
    let mut fptr = FitsFile::open(path).map_err(fits_err(path))?;
    let hdu = fptr.hdu(1).map_err(fits_err(path))?;

    let columns: Vec<String> = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            ..
        } => column_descriptions.iter().map(|cd| cd.name.clone()).collect(),
        _ => return Err(malformed(path, "first extension is not a table")),
    };

    let (wave_index, wave_name) = find_column(&columns, WAVELENGTH_COLUMN)
        .ok_or_else(|| malformed(path, format!("no {} column in {:?}", WAVELENGTH_COLUMN, columns)))?;
    let (flux_index, flux_name) = find_column(&columns, FLUX_COLUMN)
        .ok_or_else(|| malformed(path, format!("no {} column in {:?}", FLUX_COLUMN, columns)))?;

    let mut wavelengths: Vec<f64> = hdu.read_col(&mut fptr, &wave_name).map_err(fits_err(path))?;
    let mut flux: Vec<f64> = hdu.read_col(&mut fptr, &flux_name).map_err(fits_err(path))?;

    let wavelength_unit = match column_unit(&mut fptr, &hdu, wave_index) {
        Some(unit) => unit
            .parse::<WavelengthUnit>()
            .map_err(|e| malformed(path, e.to_string()))?,
        None => WavelengthUnit::Angstrom,
    };

    let flux_unit = match column_unit(&mut fptr, &hdu, flux_index) {
        Some(unit) => unit
            .parse::<FluxUnit>()
            .map_err(|e| malformed(path, e.to_string()))?,
        None => FluxUnit::Flam,
    };

    // Some libraries store the grid long-to-short
    if wavelengths.len() > 1 && wavelengths.windows(2).all(|w| w[0] > w[1]) {
        wavelengths.reverse();
        flux.reverse();
    }

    debug!(
        "Read {} samples from {} ({:?} wavelengths, {} flux)",
        wavelengths.len(),
        path.display(),
        wavelength_unit,
        flux_unit
    );

    Spectrum::with_wavelength_unit(wavelengths, flux, wavelength_unit, flux_unit)
        .map_err(|e| malformed(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_ignores_case() {
        let columns = vec!["Wavelength".to_string(), "flux ".to_string()];
        assert_eq!(
            find_column(&columns, WAVELENGTH_COLUMN),
            Some((0, "Wavelength".to_string()))
        );
        assert_eq!(find_column(&columns, FLUX_COLUMN), Some((1, "flux ".to_string())));
        assert_eq!(find_column(&columns, "ERROR"), None);
    }

    #[test]
    fn test_missing_file_is_fits_error() {
        let err = read_template(Path::new("/nonexistent/template.fits")).unwrap_err();
        assert!(matches!(err, CatalogError::Fits { .. }));
    }
}

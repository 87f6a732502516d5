//! Point-source tables

use serde::{Deserialize, Serialize};

use super::MorphologyError;

/// Column arrays describing one or more point sources.
///
/// Every field is optional; absent columns are filled with defaults when the
/// table is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointColumns {
    #[serde(default)]
    pub x: Option<Vec<f64>>,

    #[serde(default)]
    pub y: Option<Vec<f64>>,

    /// Index of the SED each source uses
    #[serde(default, rename = "ref")]
    pub sed_ref: Option<Vec<usize>>,

    #[serde(default)]
    pub weight: Option<Vec<f64>>,

    #[serde(default)]
    pub spec_type: Option<Vec<Option<String>>>,
}

impl PointColumns {
    /// Column-wise merge, taking each column from `overrides` when present
    pub fn merged(&self, overrides: &PointColumns) -> PointColumns {
        PointColumns {
            x: overrides.x.clone().or_else(|| self.x.clone()),
            y: overrides.y.clone().or_else(|| self.y.clone()),
            sed_ref: overrides.sed_ref.clone().or_else(|| self.sed_ref.clone()),
            weight: overrides.weight.clone().or_else(|| self.weight.clone()),
            spec_type: overrides.spec_type.clone().or_else(|| self.spec_type.clone()),
        }
    }

    /// Resolve the columns into a table
    ///
    /// # Errors
    ///
    /// Returns [`MorphologyError::MissingCoordinate`] when only one of `x`
    /// and `y` is given and [`MorphologyError::LengthMismatch`] when any
    /// column differs in length from `x`.
    pub fn resolve(&self) -> Result<PointTable, MorphologyError> {
        let (x, y) = match (&self.x, &self.y) {
            (None, None) => return Ok(PointTable::single_default()),
            (Some(x), Some(y)) => (x, y),
            _ => return Err(MorphologyError::MissingCoordinate),
        };

        let n = x.len();
        let y = column_or_default("y", Some(y), n, 0.0)?;
        let sed_ref = column_or_default("ref", self.sed_ref.as_ref(), n, 0)?;
        let weight = column_or_default("weight", self.weight.as_ref(), n, 1.0)?;
        let spec_type = column_or_default("spec_type", self.spec_type.as_ref(), n, None)?;

        let rows = x
            .iter()
            .zip(y)
            .zip(sed_ref)
            .zip(weight)
            .zip(spec_type)
            .map(|((((&x, y), sed_ref), weight), spectral_tag)| PointSource {
                x,
                y,
                sed_ref,
                weight,
                spectral_tag,
            })
            .collect();

        Ok(PointTable { rows })
    }
}

fn column_or_default<T: Clone>(
    field: &'static str,
    column: Option<&Vec<T>>,
    expected: usize,
    default: T,
) -> Result<Vec<T>, MorphologyError> {
    match column {
        None => Ok(vec![default; expected]),
        Some(values) if values.len() == expected => Ok(values.clone()),
        Some(values) => Err(MorphologyError::LengthMismatch {
            field,
            actual: values.len(),
            expected,
        }),
    }
}

/// One row of a point table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSource {
    /// Offset from the field center in arcseconds
    pub x: f64,
    pub y: f64,
    pub sed_ref: usize,
    /// Fraction of the total flux carried by this source
    pub weight: f64,
    pub spectral_tag: Option<String>,
}

impl Default for PointSource {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            sed_ref: 0,
            weight: 1.0,
            spectral_tag: None,
        }
    }
}

/// Ordered point sources, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointTable {
    rows: Vec<PointSource>,
}

impl PointTable {
    /// A single unit-weight source at the origin
    pub fn single_default() -> Self {
        Self {
            rows: vec![PointSource::default()],
        }
    }

    pub fn rows(&self) -> &[PointSource] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointSource> {
        self.rows.iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.rows.iter().map(|r| r.weight).sum()
    }
}

impl<'a> IntoIterator for &'a PointTable {
    type Item = &'a PointSource;
    type IntoIter = std::slice::Iter<'a, PointSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

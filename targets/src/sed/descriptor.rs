//! Parsing of spectral descriptors
//!
//! ```json
//! {
//!   "sedtype": "spectrum",
//!   "spectrum": {"spectrumtype": "blackbody", "params": {"temperature": 5800}},
//!   "extinctionav": 0.5,
//!   "redshift": {"redshift": 0.1, "baryvelcor": 12.0}
//! }
//! ```

use serde_json::{Map, Value};

use super::SedError;
use crate::catalog::{CatalogError, TemplateId};
use crate::photometry::extinction::DEFAULT_RV;
use crate::photometry::{Blackbody, Extinction, GaussianLine, PowerLaw, RedshiftMode};

/// Largest accepted blackbody temperature in Kelvin
pub const MAX_BLACKBODY_TEMPERATURE: f64 = 1e5;

/// The base spectrum before extinction and redshift
#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumModel {
    Template(TemplateId),
    Blackbody(Blackbody),
    PowerLaw(PowerLaw),
    EmissionLine(GaussianLine),
    /// User-supplied spectra are recognized but not supported
    Upload,
}

impl SpectrumModel {
    pub fn kind(&self) -> &'static str {
        match self {
            SpectrumModel::Template(_) => "template",
            SpectrumModel::Blackbody(_) => "blackbody",
            SpectrumModel::PowerLaw(_) => "powerlaw",
            SpectrumModel::EmissionLine(_) => "emissionline",
            SpectrumModel::Upload => "upload",
        }
    }
}

/// Redshift applied after extinction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RedshiftSpec {
    pub z: f64,
    pub mode: RedshiftMode,
}

/// Parsed spectral half of a target
#[derive(Debug, Clone, PartialEq)]
pub struct SedDescriptor {
    pub model: SpectrumModel,
    pub extinction: Option<Extinction>,
    pub redshift: Option<RedshiftSpec>,
    /// The request carried a barycentric velocity correction
    pub baryvelcor: bool,
}

impl SedDescriptor {
    pub fn new(model: SpectrumModel) -> Self {
        Self {
            model,
            extinction: None,
            redshift: None,
            baryvelcor: false,
        }
    }

    pub fn with_extinction(mut self, extinction: Extinction) -> Self {
        self.extinction = Some(extinction);
        self
    }

    pub fn with_redshift(mut self, z: f64) -> Self {
        self.redshift = Some(RedshiftSpec {
            z,
            mode: RedshiftMode::default(),
        });
        self
    }

    /// Change how an already configured redshift treats flux
    pub fn with_redshift_mode(mut self, mode: RedshiftMode) -> Self {
        if let Some(redshift) = self.redshift.as_mut() {
            redshift.mode = mode;
        }
        self
    }

    /// Parse a spectral descriptor
    ///
    /// # Errors
    ///
    /// Returns [`SedError::UnsupportedType`] for an unknown
    /// `sedtype`/`spectrumtype` pair and a validation error for missing,
    /// non-numeric, or out-of-range parameters.
    pub fn from_json(value: &Value) -> Result<Self, SedError> {
        let sedtype = value.get("sedtype").and_then(Value::as_str);
        let spectrum = value.get("spectrum");
        let spectrumtype = spectrum
            .and_then(|s| s.get("spectrumtype"))
            .and_then(Value::as_str);
        let empty = Map::new();

        let model = match (sedtype, spectrumtype) {
            (Some("spectrum"), Some(kind)) => {
                let params = object(spectrum.and_then(|s| s.get("params")), &empty)?;
                match kind {
                    "template" => SpectrumModel::Template(parse_template(params)?),
                    "blackbody" => SpectrumModel::Blackbody(parse_blackbody(params)?),
                    "powerlaw" => SpectrumModel::PowerLaw(parse_powerlaw(params)?),
                    "upload" => SpectrumModel::Upload,
                    _ => return Err(unsupported(sedtype, spectrumtype)),
                }
            }
            (Some("emissionline"), _) => {
                let line = value.get("emissionline");
                let params = object(line.and_then(|l| l.get("params")), &empty)?;
                SpectrumModel::EmissionLine(parse_emission_line(params)?)
            }
            _ => return Err(unsupported(sedtype, spectrumtype)),
        };

        let mut descriptor = SedDescriptor::new(model);

        if let Some(a_v) = truthy_number(value, "extinctionav")? {
            let r_v = optional_number(value, "extinctionrv")?.unwrap_or(DEFAULT_RV);
            descriptor = descriptor.with_extinction(Extinction::with_r_v(a_v, r_v));
        }

        if let Some(redshift) = value.get("redshift").filter(|r| !r.is_null()) {
            if let Some(z) = truthy_number(redshift, "redshift")? {
                descriptor = descriptor.with_redshift(z);
            }
            descriptor.baryvelcor = redshift.get("baryvelcor").is_some();
        }

        Ok(descriptor)
    }
}

fn unsupported(sedtype: Option<&str>, spectrumtype: Option<&str>) -> SedError {
    SedError::UnsupportedType {
        sedtype: sedtype.unwrap_or("None").to_string(),
        spectrumtype: spectrumtype.unwrap_or("None").to_string(),
    }
}

/// A params object, or `empty` when absent
fn object<'a>(value: Option<&'a Value>, empty: &'a Map<String, Value>) -> Result<&'a Map<String, Value>, SedError> {
    match value {
        None | Some(Value::Null) => Ok(empty),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(SedError::Descriptor(format!(
            "'params' must be an object, got {}",
            other
        ))),
    }
}

/// A numeric field, `None` when absent, zero, or null
fn truthy_number(value: &Value, name: &'static str) -> Result<Option<f64>, SedError> {
    Ok(optional_number(value, name)?.filter(|v| *v != 0.0))
}

fn optional_number(value: &Value, name: &'static str) -> Result<Option<f64>, SedError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| SedError::NotNumeric {
            name,
            value: v.to_string(),
        }),
    }
}

fn parse_template(params: &Map<String, Value>) -> Result<TemplateId, SedError> {
    let catalog = params
        .get("catalog")
        .and_then(Value::as_str)
        .ok_or(CatalogError::MissingField("catalog"))?;
    let id = params
        .get("id")
        .and_then(Value::as_str)
        .ok_or(CatalogError::MissingField("id"))?;
    Ok(TemplateId::from_names(catalog, id)?)
}

fn parse_blackbody(params: &Map<String, Value>) -> Result<Blackbody, SedError> {
    let temperature = params.get("temperature").filter(|v| !v.is_null()).ok_or(
        SedError::MissingParameter {
            model: "Blackbody",
            name: "temperature",
        },
    )?;
    let temperature = temperature.as_f64().ok_or_else(|| SedError::NotNumeric {
        name: "temperature",
        value: temperature.to_string(),
    })?;
    if !(0.0..=MAX_BLACKBODY_TEMPERATURE).contains(&temperature) {
        return Err(SedError::TemperatureOutOfRange(temperature));
    }
    Ok(Blackbody::new(temperature))
}

fn parse_powerlaw(params: &Map<String, Value>) -> Result<PowerLaw, SedError> {
    let exponent = params.get("exponent").filter(|v| !v.is_null()).ok_or(
        SedError::MissingParameter {
            model: "Power-law",
            name: "exponent",
        },
    )?;
    let exponent = exponent.as_f64().ok_or_else(|| SedError::NotNumeric {
        name: "exponent",
        value: exponent.to_string(),
    })?;
    Ok(PowerLaw::new(exponent))
}

/// Numbers and numeric strings are both accepted for line parameters
fn line_parameter(params: &Map<String, Value>, name: &'static str) -> Result<f64, SedError> {
    let raw = params
        .get(name)
        .filter(|v| !v.is_null())
        .ok_or(SedError::MissingParameter {
            model: "Emission line",
            name,
        })?;
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| SedError::NotNumeric {
        name,
        value: raw.to_string(),
    })?;

    if value <= 0.0 {
        return Err(SedError::NonPositive { name, value });
    }
    Ok(value)
}

fn parse_emission_line(params: &Map<String, Value>) -> Result<GaussianLine, SedError> {
    let center = line_parameter(params, "lambda")?;
    let fwhm = line_parameter(params, "fwhm")?;
    Ok(GaussianLine::from_fwhm(center, fwhm))
}

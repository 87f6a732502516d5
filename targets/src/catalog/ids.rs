//! Catalog ID grammars
//!
//! Each catalog encodes its template parameters in a short colon-delimited
//! string. Every grammar is a type with a `FromStr` parser and a `Display`
//! formatter that round-trip, plus the on-disk file name it maps to.
//!
//! | Catalog | ID format | Example |
//! |---|---|---|
//! | MARCS | `temperature:logg` | `5750:4.5` |
//! | PHOENIX | `temperature:logg` | `5700:4.50` |
//! | Kurucz | `spec_type:sub_type:lum_class` | `G:2:V` |
//! | Pickles | `spec_type:sub_type:lum_class` | `K:0:III` |

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

/// Errors raised while parsing a catalog-specific ID
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Malformed {catalog} ID '{id}': expected {expected}")]
    Grammar {
        catalog: &'static str,
        id: String,
        expected: &'static str,
    },

    #[error("{catalog} {field} {value} outside allowed {allowed}")]
    OutOfRange {
        catalog: &'static str,
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("Unknown {catalog} template ID: {name}")]
    UnknownName { catalog: &'static str, name: String },
}

/// Split `id` into exactly `N` colon-separated fields
fn split_fields<'a, const N: usize>(
    catalog: &'static str,
    id: &'a str,
    expected: &'static str,
) -> Result<[&'a str; N], IdError> {
    let grammar = || IdError::Grammar {
        catalog,
        id: id.to_string(),
        expected,
    };
    let parts: Vec<&str> = id.split(':').collect();
    let fields: [&str; N] = parts.try_into().map_err(|_| grammar())?;
    if fields.iter().any(|f| f.is_empty()) {
        return Err(grammar());
    }
    Ok(fields)
}

/// Temperature and surface gravity as stored by the stellar atmosphere grids.
///
/// `logg` is held as an integer count of `10^-decimals`; parse and format
/// round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TemperatureGravity {
    temperature: u32,
    logg_scaled: u32,
}

/// Grid limits for one `temperature:logg` catalog
struct GridSpec {
    catalog: &'static str,
    temperature: (u32, u32),
    temperature_allowed: &'static str,
    logg: (f64, f64),
    logg_allowed: &'static str,
    decimals: u32,
}

impl GridSpec {
    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    fn parse(&self, id: &str) -> Result<TemperatureGravity, IdError> {
        let expected = "'<temperature>:<logg>'";
        let [temp_str, logg_str] = split_fields::<2>(self.catalog, id, expected)?;
        let grammar = || IdError::Grammar {
            catalog: self.catalog,
            id: id.to_string(),
            expected,
        };

        let temperature: u32 = temp_str.trim().parse().map_err(|_| grammar())?;
        let logg: f64 = logg_str.trim().parse().map_err(|_| grammar())?;
        if !logg.is_finite() {
            return Err(grammar());
        }

        let (t_min, t_max) = self.temperature;
        if !(t_min..=t_max).contains(&temperature) {
            return Err(IdError::OutOfRange {
                catalog: self.catalog,
                field: "temperature",
                value: temperature.to_string(),
                allowed: self.temperature_allowed,
            });
        }

        let (g_min, g_max) = self.logg;
        if !(g_min..=g_max).contains(&logg) {
            return Err(IdError::OutOfRange {
                catalog: self.catalog,
                field: "logg",
                value: logg_str.trim().to_string(),
                allowed: self.logg_allowed,
            });
        }

        // Round on the exact binary value, as fixed-precision formatting does,
        // so 4.55 (stored just below) becomes 4.5. Adding 0.0 clears a -0.0.
        let rendered = format!("{:.*}", self.decimals as usize, logg + 0.0);
        let logg_scaled: u32 = rendered.replace('.', "").parse().map_err(|_| grammar())?;
        if (logg_scaled as f64 / self.scale() - logg).abs() > 1e-9 {
            debug!(
                "{} logg {} rounded to {} decimal(s)",
                self.catalog, logg, self.decimals
            );
        }

        Ok(TemperatureGravity {
            temperature,
            logg_scaled,
        })
    }

    fn format_logg(&self, logg_scaled: u32) -> String {
        let scale = 10u32.pow(self.decimals);
        format!(
            "{}.{:0width$}",
            logg_scaled / scale,
            logg_scaled % scale,
            width = self.decimals as usize
        )
    }
}

const MARCS_GRID: GridSpec = GridSpec {
    catalog: "MARCS",
    temperature: (3000, 8000),
    temperature_allowed: "[3000, 8000] K",
    logg: (3.0, 5.0),
    logg_allowed: "[3.0, 5.0]",
    decimals: 1,
};

const PHOENIX_GRID: GridSpec = GridSpec {
    catalog: "PHOENIX",
    temperature: (2300, 12000),
    temperature_allowed: "[2300, 12000] K",
    logg: (0.0, 6.0),
    logg_allowed: "[0.0, 6.0]",
    decimals: 2,
};

/// MARCS model atmosphere, `temperature:logg` with logg to one decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarcsId(TemperatureGravity);

impl MarcsId {
    const FILE_PREFIX: &'static str = "p";
    const FILE_SUFFIX: &'static str = "_m0.0_t02_st_z+0.00_a+0.00_c+0.00_n+0.00_o+0.00.fits";

    pub fn temperature(&self) -> u32 {
        self.0.temperature
    }

    pub fn logg(&self) -> f64 {
        self.0.logg_scaled as f64 / MARCS_GRID.scale()
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}{}_g+{}{}",
            Self::FILE_PREFIX,
            self.0.temperature,
            MARCS_GRID.format_logg(self.0.logg_scaled),
            Self::FILE_SUFFIX
        )
    }

    /// Recover the ID from a file name produced by [`MarcsId::file_name`]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let core = name
            .strip_prefix(Self::FILE_PREFIX)?
            .strip_suffix(Self::FILE_SUFFIX)?;
        let (temp, logg) = core.split_once("_g+")?;
        let id: Self = format!("{temp}:{logg}").parse().ok()?;
        (id.file_name() == name).then_some(id)
    }
}

impl FromStr for MarcsId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MARCS_GRID.parse(s).map(MarcsId)
    }
}

impl fmt::Display for MarcsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.0.temperature,
            MARCS_GRID.format_logg(self.0.logg_scaled)
        )
    }
}

/// PHOENIX model atmosphere, `temperature:logg` with logg to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhoenixId(TemperatureGravity);

impl PhoenixId {
    pub fn temperature(&self) -> u32 {
        self.0.temperature
    }

    pub fn logg(&self) -> f64 {
        self.0.logg_scaled as f64 / PHOENIX_GRID.scale()
    }

    /// Temperature zero-padded to five digits
    pub fn file_name(&self) -> String {
        format!(
            "lte{:05}-{}-PHOENIX.fits",
            self.0.temperature,
            PHOENIX_GRID.format_logg(self.0.logg_scaled)
        )
    }

    /// Recover the ID from a file name produced by [`PhoenixId::file_name`]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let core = name.strip_prefix("lte")?.strip_suffix("-PHOENIX.fits")?;
        let (temp, logg) = core.split_once('-')?;
        let id: Self = format!("{}:{}", temp.trim_start_matches('0'), logg)
            .parse()
            .ok()?;
        (id.file_name() == name).then_some(id)
    }
}

impl FromStr for PhoenixId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PHOENIX_GRID.parse(s).map(PhoenixId)
    }
}

impl fmt::Display for PhoenixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.0.temperature,
            PHOENIX_GRID.format_logg(self.0.logg_scaled)
        )
    }
}

/// The Harvard spectral classes, hottest to coolest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl SpectralClass {
    pub const ALL: [SpectralClass; 7] = [
        SpectralClass::O,
        SpectralClass::B,
        SpectralClass::A,
        SpectralClass::F,
        SpectralClass::G,
        SpectralClass::K,
        SpectralClass::M,
    ];

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_string() == s)
    }
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SpectralClass::O => 'O',
                SpectralClass::B => 'B',
                SpectralClass::A => 'A',
                SpectralClass::F => 'F',
                SpectralClass::G => 'G',
                SpectralClass::K => 'K',
                SpectralClass::M => 'M',
            }
        )
    }
}

/// Morgan-Keenan luminosity classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuminosityClass {
    /// Supergiants
    I,
    /// Bright giants
    II,
    /// Giants
    III,
    /// Subgiants
    IV,
    /// Main sequence
    V,
}

impl LuminosityClass {
    pub const ALL: [LuminosityClass; 5] = [
        LuminosityClass::I,
        LuminosityClass::II,
        LuminosityClass::III,
        LuminosityClass::IV,
        LuminosityClass::V,
    ];

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_string() == s)
    }
}

impl fmt::Display for LuminosityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LuminosityClass::I => "I",
            LuminosityClass::II => "II",
            LuminosityClass::III => "III",
            LuminosityClass::IV => "IV",
            LuminosityClass::V => "V",
        };
        write!(f, "{}", name)
    }
}

/// A `spec_type:sub_type:lum_class` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ClassTriple {
    spectral_class: SpectralClass,
    sub_type: u8,
    luminosity: LuminosityClass,
}

/// Allowed values for one spectral-class catalog
struct ClassSpec {
    catalog: &'static str,
    sub_types: &'static [u8],
    sub_types_allowed: &'static str,
    luminosities: &'static [LuminosityClass],
    luminosities_allowed: &'static str,
}

impl ClassSpec {
    fn parse(&self, id: &str) -> Result<ClassTriple, IdError> {
        let expected = "'<spec_type>:<sub_type>:<lum_class>'";
        let [class_str, sub_str, lum_str] = split_fields::<3>(self.catalog, id, expected)?;

        let spectral_class = SpectralClass::parse(class_str).ok_or_else(|| IdError::OutOfRange {
            catalog: self.catalog,
            field: "spectral type",
            value: class_str.to_string(),
            allowed: "{O, B, A, F, G, K, M}",
        })?;

        let sub_type = sub_str
            .parse::<u8>()
            .ok()
            .filter(|s| self.sub_types.contains(s))
            .ok_or_else(|| IdError::OutOfRange {
                catalog: self.catalog,
                field: "sub type",
                value: sub_str.to_string(),
                allowed: self.sub_types_allowed,
            })?;

        let luminosity = LuminosityClass::parse(lum_str)
            .filter(|l| self.luminosities.contains(l))
            .ok_or_else(|| IdError::OutOfRange {
                catalog: self.catalog,
                field: "luminosity class",
                value: lum_str.to_string(),
                allowed: self.luminosities_allowed,
            })?;

        Ok(ClassTriple {
            spectral_class,
            sub_type,
            luminosity,
        })
    }

    fn all(&self) -> Vec<ClassTriple> {
        let mut triples = Vec::new();
        for spectral_class in SpectralClass::ALL {
            for &sub_type in self.sub_types {
                for &luminosity in self.luminosities {
                    triples.push(ClassTriple {
                        spectral_class,
                        sub_type,
                        luminosity,
                    });
                }
            }
        }
        triples
    }
}

impl ClassTriple {
    fn file_name(&self) -> String {
        format!("{}{}{}.fits", self.spectral_class, self.sub_type, self.luminosity)
    }
}

impl fmt::Display for ClassTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.spectral_class, self.sub_type, self.luminosity)
    }
}

const KURUCZ_CLASSES: ClassSpec = ClassSpec {
    catalog: "Kurucz",
    sub_types: &[2, 5, 8],
    sub_types_allowed: "{2, 5, 8}",
    luminosities: &[LuminosityClass::I, LuminosityClass::V],
    luminosities_allowed: "{I, V}",
};

const PICKLES_CLASSES: ClassSpec = ClassSpec {
    catalog: "Pickles",
    sub_types: &[0, 2, 5, 8],
    sub_types_allowed: "{0, 2, 5, 8}",
    luminosities: &LuminosityClass::ALL,
    luminosities_allowed: "{I, II, III, IV, V}",
};

macro_rules! class_id {
    ($(#[$meta:meta])* $name:ident, $spec:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(ClassTriple);

        impl $name {
            pub fn spectral_class(&self) -> SpectralClass {
                self.0.spectral_class
            }

            pub fn sub_type(&self) -> u8 {
                self.0.sub_type
            }

            pub fn luminosity(&self) -> LuminosityClass {
                self.0.luminosity
            }

            pub fn file_name(&self) -> String {
                self.0.file_name()
            }

            /// Every ID the grammar admits
            pub fn all() -> Vec<Self> {
                $spec.all().into_iter().map($name).collect()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $spec.parse(s).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

class_id!(
    /// Kurucz stellar template: sub type in {2, 5, 8}, luminosity I or V
    KuruczId,
    KURUCZ_CLASSES
);

class_id!(
    /// Pickles stellar library entry: sub type in {0, 2, 5, 8}, any luminosity class
    PicklesId,
    PICKLES_CLASSES
);

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T>(id: &str)
    where
        T: FromStr<Err = IdError> + fmt::Display + PartialEq + fmt::Debug,
    {
        let parsed: T = id.parse().unwrap();
        let formatted = parsed.to_string();
        let reparsed: T = formatted.parse().unwrap();
        assert_eq!(parsed, reparsed, "{} -> {}", id, formatted);
    }

    #[test]
    fn test_marcs_round_trip_and_file_name() {
        round_trip::<MarcsId>("5750:4.5");
        round_trip::<MarcsId>("3000:3");
        round_trip::<MarcsId>("8000:5.0");

        let id: MarcsId = "5750:4.5".parse().unwrap();
        assert_eq!(id.to_string(), "5750:4.5");
        assert_eq!(id.temperature(), 5750);
        assert_eq!(id.logg(), 4.5);
        assert_eq!(
            id.file_name(),
            "p5750_g+4.5_m0.0_t02_st_z+0.00_a+0.00_c+0.00_n+0.00_o+0.00.fits"
        );
        assert_eq!(MarcsId::from_file_name(&id.file_name()), Some(id));
        assert_eq!(MarcsId::from_file_name("p5750_g+4.5.fits"), None);

        let integral: MarcsId = "4000:3".parse().unwrap();
        assert_eq!(integral.to_string(), "4000:3.0");
    }

    #[test]
    fn test_marcs_rejections() {
        assert!(matches!(
            "bad".parse::<MarcsId>(),
            Err(IdError::Grammar { catalog: "MARCS", .. })
        ));
        assert!(matches!(
            "5750.5:4.5".parse::<MarcsId>(),
            Err(IdError::Grammar { .. })
        ));
        assert!(matches!(
            "5750:4.5:1".parse::<MarcsId>(),
            Err(IdError::Grammar { .. })
        ));
        assert_eq!(
            "9000:4.5".parse::<MarcsId>().unwrap_err().to_string(),
            "MARCS temperature 9000 outside allowed [3000, 8000] K"
        );
        assert_eq!(
            "5000:5.5".parse::<MarcsId>().unwrap_err().to_string(),
            "MARCS logg 5.5 outside allowed [3.0, 5.0]"
        );
    }

    #[test]
    fn test_phoenix_round_trip_and_file_name() {
        round_trip::<PhoenixId>("5700:4.50");
        round_trip::<PhoenixId>("2300:0");
        round_trip::<PhoenixId>("12000:6.00");

        let id: PhoenixId = "5700:4.5".parse().unwrap();
        assert_eq!(id.to_string(), "5700:4.50");
        assert_eq!(id.file_name(), "lte05700-4.50-PHOENIX.fits");
        assert_eq!(PhoenixId::from_file_name("lte05700-4.50-PHOENIX.fits"), Some(id));

        let hot: PhoenixId = "12000:0.25".parse().unwrap();
        assert_eq!(hot.file_name(), "lte12000-0.25-PHOENIX.fits");
        assert_eq!(hot.logg(), 0.25);
    }

    #[test]
    fn test_off_grid_logg_rounds_like_fixed_precision_formatting() {
        // 4.55 is stored just below 4.55, so it renders as 4.5
        let id: MarcsId = "5750:4.55".parse().unwrap();
        assert_eq!(id.to_string(), "5750:4.5");
        assert!(id.file_name().starts_with("p5750_g+4.5_"));

        let id: MarcsId = "5750:4.56".parse().unwrap();
        assert_eq!(id.to_string(), "5750:4.6");

        let id: PhoenixId = "5700:4.005".parse().unwrap();
        assert_eq!(id.file_name(), "lte05700-4.00-PHOENIX.fits");

        let id: PhoenixId = "5700:-0.0".parse().unwrap();
        assert_eq!(id.to_string(), "5700:0.00");
    }

    #[test]
    fn test_phoenix_rejections() {
        assert!(matches!(
            "bad".parse::<PhoenixId>(),
            Err(IdError::Grammar { catalog: "PHOENIX", .. })
        ));
        assert!(matches!(
            "2200:4.5".parse::<PhoenixId>(),
            Err(IdError::OutOfRange { field: "temperature", .. })
        ));
        assert!(matches!(
            "5000:-0.5".parse::<PhoenixId>(),
            Err(IdError::OutOfRange { field: "logg", .. })
        ));
        assert!(matches!(
            "5000:nan".parse::<PhoenixId>(),
            Err(IdError::Grammar { .. })
        ));
    }

    #[test]
    fn test_kurucz_ids() {
        round_trip::<KuruczId>("G:2:V");
        round_trip::<KuruczId>("O:8:I");

        let id: KuruczId = "G:2:V".parse().unwrap();
        assert_eq!(id.spectral_class(), SpectralClass::G);
        assert_eq!(id.sub_type(), 2);
        assert_eq!(id.luminosity(), LuminosityClass::V);
        assert_eq!(id.file_name(), "G2V.fits");
        assert_eq!(KuruczId::all().len(), 7 * 3 * 2);

        assert!(matches!(
            "Z:9:X".parse::<KuruczId>(),
            Err(IdError::OutOfRange { field: "spectral type", .. })
        ));
        assert!(matches!(
            "G:0:V".parse::<KuruczId>(),
            Err(IdError::OutOfRange { field: "sub type", .. })
        ));
        assert!(matches!(
            "G:2:III".parse::<KuruczId>(),
            Err(IdError::OutOfRange { field: "luminosity class", .. })
        ));
        assert!(matches!(
            "G2V".parse::<KuruczId>(),
            Err(IdError::Grammar { .. })
        ));
        // Case sensitive
        assert!("g:2:v".parse::<KuruczId>().is_err());
    }

    #[test]
    fn test_pickles_ids() {
        round_trip::<PicklesId>("K:0:III");
        round_trip::<PicklesId>("M:8:IV");

        let id: PicklesId = "K:0:III".parse().unwrap();
        assert_eq!(id.file_name(), "K0III.fits");
        assert_eq!(PicklesId::all().len(), 7 * 4 * 5);

        assert!("G:1:V".parse::<PicklesId>().is_err());
        assert!("G:2:VI".parse::<PicklesId>().is_err());
        assert!("G::V".parse::<PicklesId>().is_err());
    }
}

//! Fixed name tables for the galaxy and nebula template catalogs

use std::fmt;

use super::ids::IdError;

/// A descriptive template name and the file it lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedTemplate {
    pub name: &'static str,
    pub file_name: &'static str,
}

impl fmt::Display for NamedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const fn entry(name: &'static str, file_name: &'static str) -> NamedTemplate {
    NamedTemplate { name, file_name }
}

/// SWIRE galaxy and AGN templates
pub const SWIRE: &[NamedTemplate] = &[
    entry("13 Gyr old elliptical", "Ell13.fits"),
    entry("2 Gyr old elliptical", "Ell2.fits"),
    entry("5 Gyr old elliptical", "Ell5.fits"),
    entry("AGN BQSO1", "BQSO1.fits"),
    entry("AGN QSO1", "QSO1.fits"),
    entry("AGN QSO2", "QSO2.fits"),
    entry("AGN Seyfert 1.8", "Sey18.fits"),
    entry("AGN Seyfert 2.0", "Sey2.fits"),
    entry("AGN TQSO1", "TQSO1.fits"),
    entry("AGN Torus", "Torus.fits"),
    entry("BAL QSO, Seyfert 1, ULIRG Mrk 231", "Mrk231.fits"),
    entry("Spiral 0", "S0.fits"),
    entry("Spiral a", "Sa.fits"),
    entry("Spiral b", "Sb.fits"),
    entry("Spiral c", "Sc.fits"),
    entry("Spiral c4", "Spi4.fits"),
    entry("Spiral dm", "Sdm.fits"),
    entry("Starburst Arp 220", "Arp220.fits"),
    entry("Starburst IRAS 19254-7245 South", "I19254.fits"),
    entry("Starburst IRAS 20551-4250", "I20551.fits"),
];

/// Kinney-Calzetti galaxy templates
pub const KINNEY: &[NamedTemplate] = &[
    entry("Elliptical Galaxy", "Kinney_ell.fits"),
    entry("S0 Galaxy", "Kinney_s0.fits"),
    entry("Sa Galaxy", "Kinney_sa.fits"),
    entry("Sb Galaxy", "Kinney_sb.fits"),
    entry("Starburst Galaxy 1", "Kinney_starb1.fits"),
    entry("Starburst Galaxy 2", "Kinney_starb2.fits"),
    entry("Starburst Galaxy 3", "Kinney_starb3.fits"),
    entry("Starburst Galaxy 4", "Kinney_starb4.fits"),
    entry("Starburst Galaxy 5", "Kinney_starb5.fits"),
    entry("Starburst Galaxy 6", "Kinney_starb6.fits"),
];

/// Miscellaneous emission-line objects
pub const VARIOUS: &[NamedTemplate] = &[
    entry("HII region (Orion)", "orion.fits"),
    entry("Planetary Nebula", "pn.fits"),
];

/// Exact, case-sensitive lookup of `name` in `table`
pub fn lookup(
    catalog: &'static str,
    table: &'static [NamedTemplate],
    name: &str,
) -> Result<NamedTemplate, IdError> {
    table
        .iter()
        .copied()
        .find(|t| t.name == name)
        .ok_or_else(|| IdError::UnknownName {
            catalog,
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_sizes() {
        assert_eq!(SWIRE.len(), 20);
        assert_eq!(KINNEY.len(), 10);
        assert_eq!(VARIOUS.len(), 2);
    }

    #[test]
    fn test_names_and_files_unique() {
        for table in [SWIRE, KINNEY, VARIOUS] {
            let names: HashSet<_> = table.iter().map(|t| t.name).collect();
            let files: HashSet<_> = table.iter().map(|t| t.file_name).collect();
            assert_eq!(names.len(), table.len());
            assert_eq!(files.len(), table.len());
        }
    }

    #[test]
    fn test_lookup() {
        let t = lookup("SWIRE", SWIRE, "2 Gyr old elliptical").unwrap();
        assert_eq!(t.file_name, "Ell2.fits");
        assert_eq!(t.to_string(), "2 Gyr old elliptical");

        let t = lookup("Kinney", KINNEY, "Sb Galaxy").unwrap();
        assert_eq!(t.file_name, "Kinney_sb.fits");

        let t = lookup("Various", VARIOUS, "Planetary Nebula").unwrap();
        assert_eq!(t.file_name, "pn.fits");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(lookup("SWIRE", SWIRE, "Not a real ID").is_err());
        assert!(lookup("Kinney", KINNEY, "sb galaxy").is_err());
        assert!(lookup("Various", VARIOUS, " Planetary Nebula").is_err());

        let err = lookup("Various", VARIOUS, "Unknown Object").unwrap_err();
        assert_eq!(err.to_string(), "Unknown Various template ID: Unknown Object");
    }
}

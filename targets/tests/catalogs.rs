//! Template store tests against FITS files written to a temporary root

use approx::assert_relative_eq;
use targets::catalog::{CatalogError, IdError};
use targets::photometry::FluxUnit;
use targets::{Catalog, TemplateCache, TemplateId, TemplateSource, TemplateStore};
use test_helpers::{FixtureSpectrum, TemplateFixture};

const VALID_IDS: [(&str, &str); 7] = [
    ("MARCS", "5750:4.5"),
    ("PHOENIX", "5700:4.50"),
    ("SWIRE", "2 Gyr old elliptical"),
    ("Kinney", "Sb Galaxy"),
    ("Kurucz", "G:2:V"),
    ("Pickles", "G:2:V"),
    ("Various", "Planetary Nebula"),
];

fn write_id(fixture: &TemplateFixture, id: &TemplateId, spectrum: &FixtureSpectrum) {
    fixture
        .write_template(id.catalog().dir_name(), &id.file_name(), spectrum)
        .unwrap();
}

/// Fixture root holding one default template per catalog
fn populated() -> (TemplateFixture, Vec<TemplateId>) {
    let fixture = TemplateFixture::new().unwrap();
    let ids: Vec<TemplateId> = VALID_IDS
        .iter()
        .map(|(catalog, id)| TemplateId::from_names(catalog, id).unwrap())
        .collect();
    for id in &ids {
        write_id(&fixture, id, &FixtureSpectrum::default());
    }
    (fixture, ids)
}

#[test]
fn test_every_catalog_loads() {
    let (fixture, ids) = populated();
    let store = TemplateStore::new(fixture.root());
    let expected = FixtureSpectrum::default();

    for id in &ids {
        let spectrum = store.load(id).unwrap();
        assert_eq!(spectrum.len(), expected.wavelengths.len(), "{}", id);
        assert_relative_eq!(spectrum.range().0, 3000.0);
        assert_relative_eq!(spectrum.range().1, 11000.0);
        assert_relative_eq!(spectrum.at(6000.0), 1e-14, max_relative = 1e-9);
    }
}

#[test]
fn test_load_by_name_matches_load() {
    let (fixture, ids) = populated();
    let store = TemplateStore::new(fixture.root());
    let by_name = store.load_by_name("Kurucz", "G:2:V").unwrap();
    assert_eq!(by_name, store.load(&ids[4]).unwrap());
}

#[test]
fn test_invalid_ids_are_validation_errors() {
    let (fixture, _) = populated();
    let store = TemplateStore::new(fixture.root());

    let cases = [
        ("MARCS", "bad"),
        ("PHOENIX", "bad"),
        ("MARCS", "9000:4.5"),
        ("SWIRE", "Not a real ID"),
        ("Kinney", "Not a real ID"),
        ("Kurucz", "Z:9:X"),
        ("Pickles", "Z:9:X"),
        ("Various", "Unknown Object"),
    ];
    for (catalog, id) in cases {
        let err = store.load_by_name(catalog, id).unwrap_err();
        assert!(err.is_validation(), "{} {}: {}", catalog, id, err);
        assert!(matches!(err, CatalogError::InvalidId(_)));
    }

    let err = store.load_by_name("Bruzual", "anything").unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedCatalog(_)));
}

#[test]
fn test_unknown_name_message() {
    let err = TemplateId::from_names("Various", "Unknown Object").unwrap_err();
    match err {
        CatalogError::InvalidId(IdError::UnknownName { .. }) => {
            assert_eq!(err.to_string(), "Unknown Various template ID: Unknown Object");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_resource_error() {
    let fixture = TemplateFixture::new().unwrap();
    let store = TemplateStore::new(fixture.root());
    let err = store.load_by_name("MARCS", "5750:4.5").unwrap_err();
    assert!(matches!(err, CatalogError::FileNotFound { .. }));
    assert!(!err.is_validation());
}

#[test]
fn test_malformed_files_are_resource_errors() {
    let fixture = TemplateFixture::new().unwrap();
    let store = TemplateStore::new(fixture.root());

    let garbage = TemplateId::from_names("Kurucz", "G:2:V").unwrap();
    fixture
        .write_garbage(garbage.catalog().dir_name(), &garbage.file_name())
        .unwrap();
    let err = store.load(&garbage).unwrap_err();
    assert!(matches!(err, CatalogError::Fits { .. }));
    assert!(!err.is_validation());

    let no_flux = TemplateId::from_names("Pickles", "G:2:V").unwrap();
    write_id(
        &fixture,
        &no_flux,
        &FixtureSpectrum::default().with_columns("WAVELENGTH", "FLUX_ERR"),
    );
    let err = store.load(&no_flux).unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));

    let bad_unit = TemplateId::from_names("Various", "Planetary Nebula").unwrap();
    write_id(&fixture, &bad_unit, &FixtureSpectrum::default().with_unit(Some("furlongs")));
    let err = store.load(&bad_unit).unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));
}

#[test]
fn test_columns_and_units_are_normalized() {
    let fixture = TemplateFixture::new().unwrap();
    let store = TemplateStore::new(fixture.root());

    let lowercase = TemplateId::from_names("Kurucz", "G:2:V").unwrap();
    write_id(
        &fixture,
        &lowercase,
        &FixtureSpectrum::default()
            .with_columns("wavelength", "flux")
            .with_unit(None),
    );
    let spectrum = store.load(&lowercase).unwrap();
    assert_relative_eq!(spectrum.range().0, 3000.0);

    let microns = TemplateId::from_names("Pickles", "G:2:V").unwrap();
    write_id(&fixture, &microns, &FixtureSpectrum::default().in_unit("micron", 1e4));
    let spectrum = store.load(&microns).unwrap();
    assert_relative_eq!(spectrum.range().0, 3000.0, max_relative = 1e-12);
    assert_relative_eq!(spectrum.range().1, 11000.0, max_relative = 1e-12);

    let mut descending = FixtureSpectrum::default();
    descending.wavelengths.reverse();
    descending.flux.reverse();
    let reversed = TemplateId::from_names("Kinney", "Sb Galaxy").unwrap();
    write_id(&fixture, &reversed, &descending);
    let spectrum = store.load(&reversed).unwrap();
    assert!(spectrum.wavelengths().windows(2).all(|w| w[0] < w[1]));
    assert_relative_eq!(spectrum.at(6000.0), 1e-14, max_relative = 1e-9);
}

#[test]
fn test_flux_unit_follows_tunit() {
    let fixture = TemplateFixture::new().unwrap();
    let store = TemplateStore::new(fixture.root());

    let untagged = TemplateId::from_names("Kurucz", "G:2:V").unwrap();
    write_id(&fixture, &untagged, &FixtureSpectrum::default());
    assert_eq!(store.load(&untagged).unwrap().unit(), FluxUnit::Flam);

    let per_sr = TemplateId::from_names("Pickles", "G:2:V").unwrap();
    write_id(
        &fixture,
        &per_sr,
        &FixtureSpectrum::default().with_flux_unit("erg/s/cm2/A/sr"),
    );
    assert_eq!(store.load(&per_sr).unwrap().unit(), FluxUnit::FlamPerSteradian);

    let normalized = TemplateId::from_names("Kinney", "Sb Galaxy").unwrap();
    write_id(
        &fixture,
        &normalized,
        &FixtureSpectrum::default().with_flux_unit("normalized"),
    );
    assert_eq!(store.load(&normalized).unwrap().unit(), FluxUnit::Normalized);

    let jansky = TemplateId::from_names("Various", "Planetary Nebula").unwrap();
    write_id(&fixture, &jansky, &FixtureSpectrum::default().with_flux_unit("Jy"));
    let err = store.load(&jansky).unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));
    assert!(!err.is_validation());
}

#[test]
fn test_list_reports_files_on_disk() {
    let (fixture, ids) = populated();
    let store = TemplateStore::new(fixture.root());

    let extra = TemplateId::from_names("MARCS", "4000:3.0").unwrap();
    write_id(&fixture, &extra, &FixtureSpectrum::default());
    fixture.write_garbage("MARCS", "README.txt").unwrap();

    let marcs = store.list(Catalog::Marcs).unwrap();
    assert_eq!(marcs, vec![extra, ids[0]]);

    assert_eq!(store.list(Catalog::Kurucz).unwrap(), vec![ids[4]]);
    assert_eq!(store.list(Catalog::Various).unwrap(), vec![ids[6]]);

    let empty = TemplateStore::new(fixture.root().join("nowhere"));
    assert!(empty.list(Catalog::Phoenix).unwrap().is_empty());
}

#[test]
fn test_cache_reads_each_file_once() {
    let (fixture, ids) = populated();
    let cache = TemplateCache::new(TemplateStore::new(fixture.root()));

    let first = cache.template(&ids[2]).unwrap();
    // A cached entry survives the file going away
    std::fs::remove_file(cache.store().path_for(&ids[2])).unwrap();
    let second = cache.template(&ids[2]).unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);

    cache.clear();
    let err = cache.template(&ids[2]).unwrap_err();
    assert!(matches!(err, CatalogError::FileNotFound { .. }));
    assert!(cache.is_empty());
}

#[test]
fn test_cache_does_not_remember_failures() {
    let fixture = TemplateFixture::new().unwrap();
    let cache = TemplateCache::new(TemplateStore::new(fixture.root()));
    let id = TemplateId::from_names("SWIRE", "2 Gyr old elliptical").unwrap();

    for _ in 0..2 {
        let err = cache.template(&id).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
        assert!(cache.is_empty());
    }

    // Once the file appears the next lookup loads it and keeps it
    write_id(&fixture, &id, &FixtureSpectrum::default());
    let loaded = cache.get(&id).unwrap();
    std::fs::remove_file(cache.store().path_for(&id)).unwrap();
    let again = cache.get(&id).unwrap();
    assert!(std::sync::Arc::ptr_eq(&loaded, &again));
    assert_eq!(cache.len(), 1);
}

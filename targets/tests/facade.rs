//! End-to-end synthesis from descriptor files

use approx::assert_relative_eq;
use serde_json::json;
use targets::morphology::image::INFINITE_EXTNAME;
use targets::morphology::SpatialProduct;
use targets::{
    ErrorKind, FieldRequest, TargetDescriptor, TargetModel, TemplateCache, TemplateId,
    TemplateStore,
};
use test_helpers::{demo_descriptor, FixtureSpectrum, TemplateFixture};

fn load_demo(name: &str) -> TargetModel {
    let text = std::fs::read_to_string(demo_descriptor(name)).unwrap();
    TargetModel::from_descriptor(&TargetDescriptor::from_json_str(&text).unwrap()).unwrap()
}

#[test]
fn test_sersic_blackbody_demo() {
    let model = load_demo("sersic_blackbody.json");
    let store = TemplateStore::new("/nonexistent/templates");
    let source = model
        .synthesize(&FieldRequest::sampled(0.05, 6.0), &store)
        .unwrap();

    let image = source.spatial.as_image().unwrap();
    assert_eq!(image.npix(), 121);
    assert_relative_eq!(image.sum(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(image.keyword("ELLIPTIC").unwrap(), 0.3);
    assert_relative_eq!(image.keyword("ANGLE").unwrap(), 30.0);

    // Redshifted by z = 0.1
    let (min, max) = source.sed.spectrum.range();
    assert_relative_eq!(min, 1100.0, max_relative = 1e-9);
    assert_relative_eq!(max, 330000.0, max_relative = 1e-9);
    assert!(source.sed.advisories.is_empty());
}

#[test]
fn test_point_template_demo() {
    let fixture = TemplateFixture::new().unwrap();
    let id = TemplateId::from_names("Kurucz", "G:2:V").unwrap();
    fixture
        .write_template(id.catalog().dir_name(), &id.file_name(), &FixtureSpectrum::default())
        .unwrap();
    let cache = TemplateCache::new(TemplateStore::new(fixture.root()));

    let model = load_demo("point_template.json");
    let source = model.synthesize(&FieldRequest::new(), &cache).unwrap();

    let table = source.spatial.as_points().unwrap();
    assert_eq!(table.len(), 2);
    assert_relative_eq!(table.total_weight(), 1.25);
    assert_relative_eq!(source.sed.spectrum.at(6000.0), 1e-14, max_relative = 1e-9);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_infinite_line_demo() {
    let model = load_demo("infinite_line.json");
    let store = TemplateStore::new("/nonexistent/templates");
    let source = model
        .synthesize(&FieldRequest::sampled(0.5, 4.0), &store)
        .unwrap();

    match &source.spatial {
        SpatialProduct::Image(image) => {
            assert_eq!(image.extname(), INFINITE_EXTNAME);
            assert!(image.data().iter().all(|&v| v == 0.25));
        }
        other => panic!("expected an image, got {:?}", other),
    }

    let (peak_wavelength, _) = source.sed.spectrum.peak();
    assert_relative_eq!(peak_wavelength, 6563.0, epsilon = 0.5);
}

#[test]
fn test_request_overrides_descriptor_shape() {
    let model = load_demo("sersic_blackbody.json");
    let store = TemplateStore::new("/nonexistent/templates");
    let request = FieldRequest::sampled(0.05, 6.0).with_shape(0.0, 0.0);
    let source = model.synthesize(&request, &store).unwrap();
    let image = source.spatial.as_image().unwrap();
    assert_relative_eq!(image.keyword("ELLIPTIC").unwrap(), 0.0);
}

#[test]
fn test_error_kinds_end_to_end() {
    let store = TemplateStore::new("/nonexistent/templates");
    let point = json!({"morphologytype": "point"});

    let upload = json!({
        "morphology": point,
        "sed": {"sedtype": "spectrum", "spectrum": {"spectrumtype": "upload"}}
    });
    let model = TargetModel::from_json(&upload).unwrap();
    let err = model.synthesize(&FieldRequest::new(), &store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    let missing = json!({
        "morphology": point,
        "sed": {
            "sedtype": "spectrum",
            "spectrum": {"spectrumtype": "template", "params": {"catalog": "Pickles", "id": "G:2:V"}}
        }
    });
    let model = TargetModel::from_json(&missing).unwrap();
    let err = model.synthesize(&FieldRequest::new(), &store).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);

    let bad_type = json!({
        "morphology": {"morphologytype": "galaxy"},
        "sed": {"sedtype": "spectrum", "spectrum": {"spectrumtype": "blackbody", "params": {"temperature": 5000}}}
    });
    let err = TargetModel::from_json(&bad_type).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Unknown morphologytype: galaxy"));
}

//! Target summary tool
//!
//! Reads a target descriptor from a JSON file, synthesizes its spatial and
//! spectral products, and prints what came out. Nothing is written to disk.

use std::path::PathBuf;

use clap::Parser;
use targets::config::{EngineArgs, EngineConfig};
use targets::morphology::SpatialProduct;
use targets::{SourceModel, TargetDescriptor, TargetModel};

#[derive(Parser, Debug)]
#[command(
    name = "Target Summary",
    about = "Synthesizes a target descriptor and summarizes the resulting source model",
    long_about = None
)]
struct Args {
    /// Path to the target descriptor JSON
    descriptor: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,
}

fn print_spatial(spatial: &SpatialProduct) {
    match spatial {
        SpatialProduct::Points(table) => {
            println!("Spatial: point table with {} row(s)", table.len());
            println!("  {:>10} {:>10} {:>5} {:>8}  tag", "x", "y", "ref", "weight");
            for row in table {
                println!(
                    "  {:>10.4} {:>10.4} {:>5} {:>8.4}  {}",
                    row.x,
                    row.y,
                    row.sed_ref,
                    row.weight,
                    row.spectral_tag.as_deref().unwrap_or("-")
                );
            }
        }
        SpatialProduct::Image(image) => {
            println!(
                "Spatial: {} image {}x{} (sum {:.6})",
                image.extname(),
                image.npix(),
                image.npix(),
                image.sum()
            );
            for (key, value) in image.keywords() {
                println!("  {:<8} = {}", key, value);
            }
        }
    }
}

fn print_summary(source: &SourceModel) {
    print_spatial(&source.spatial);

    let spectrum = &source.sed.spectrum;
    let (min, max) = spectrum.range();
    let (peak_wavelength, peak_flux) = spectrum.peak();
    println!();
    println!("Spectrum: {} samples, {} flux", spectrum.len(), spectrum.unit());
    println!("  Range: {:.2} - {:.2} AA", min, max);
    println!("  Peak:  {:.4e} at {:.2} AA", peak_flux, peak_wavelength);

    for advisory in &source.sed.advisories {
        println!("Advisory: {}", advisory);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = EngineConfig::resolve(&args.engine)?;
    let store = config.template_store();
    println!("Templates root: {}", store.root().display());

    let text = std::fs::read_to_string(&args.descriptor).map_err(|e| {
        format!(
            "Failed to read descriptor '{}': {}",
            args.descriptor.display(),
            e
        )
    })?;
    let descriptor = TargetDescriptor::from_json_str(&text)?;
    let model = TargetModel::from_descriptor(&descriptor)?;

    match model.synthesize(&config.field_request(), &store) {
        Ok(source) => {
            print_summary(&source);
            Ok(())
        }
        Err(e) => {
            eprintln!("{:?} error: {}", e.kind(), e);
            Err(e.into())
        }
    }
}

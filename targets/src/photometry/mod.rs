//! Photometry models and utilities

pub mod extinction;
pub mod models;
pub mod spectrum;
pub mod throughput;
pub mod trapezoid;

pub use extinction::{Extinction, ExtinctionError, ReddeningLaw};
pub use models::{Blackbody, GaussianLine, PowerLaw};
pub use spectrum::{FluxUnit, RedshiftMode, Spectrum, SpectrumError, WavelengthUnit};
pub use throughput::ThroughputCurve;
pub use trapezoid::trap_integrate;

//! Numerical building blocks shared by the spectral and spatial models.

pub mod misc;
pub mod spline;

pub use misc::{interp, logspace, InterpError};
pub use spline::{CubicSpline, SplineError};

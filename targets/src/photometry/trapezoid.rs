//! Trapezoidal integration utility

use thiserror::Error;

/// Errors that can occur during trapezoidal integration
#[derive(Debug, Error, PartialEq)]
pub enum TrapezoidError {
    #[error("Insufficient points for integration, need at least 2 points")]
    InsufficientPoints,

    #[error("Points must be in ascending order")]
    NotAscending,

    #[error("Sample and value arrays differ in length: {0} vs {1}")]
    LengthMismatch(usize, usize),
}

/// Performs trapezoidal integration of tabulated samples.
///
/// # Arguments
///
/// * `xs` - Sample positions in ascending order
/// * `ys` - Sampled values, one per position
///
/// # Returns
///
/// The result of the trapezoidal integration or an error if the input is invalid.
pub fn trap_integrate(xs: &[f64], ys: &[f64]) -> Result<f64, TrapezoidError> {
    if xs.len() != ys.len() {
        return Err(TrapezoidError::LengthMismatch(xs.len(), ys.len()));
    }

    if xs.len() < 2 {
        return Err(TrapezoidError::InsufficientPoints);
    }

    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(TrapezoidError::NotAscending);
    }

    // ∫[x₁,x₂] f(x)dx ≈ (x₂-x₁) × (f(x₁)+f(x₂))/2
    let integral_sum = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum();

    Ok(integral_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trap_integrate() {
        // f(x) = x^2 sampled at 0..3:
        // (1-0)(0^2+1^2)/2 + (2-1)(1^2+2^2)/2 + (3-2)(2^2+3^2)/2
        // = 0.5 + 2.5 + 6.5 = 9.5
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let result = trap_integrate(&xs, &ys).unwrap();

        assert_relative_eq!(result, 9.5, epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient_points() {
        let result = trap_integrate(&[1.0], &[1.0]);
        assert_eq!(result, Err(TrapezoidError::InsufficientPoints));
    }

    #[test]
    fn test_not_ascending() {
        let xs = [0.0, 2.0, 1.0, 3.0];
        let result = trap_integrate(&xs, &xs);
        assert_eq!(result, Err(TrapezoidError::NotAscending));
    }

    #[test]
    fn test_length_mismatch() {
        let result = trap_integrate(&[0.0, 1.0, 2.0], &[0.0, 1.0]);
        assert_eq!(result, Err(TrapezoidError::LengthMismatch(3, 2)));
    }
}

//! Miscellaneous numerical helpers shared by the spectral and spatial models.
//!
//! - **Linear interpolation** on tabulated curves with explicit bounds errors
//! - **Grid validation** for strictly increasing sample positions
//! - **Logarithmic spacing** for analytic wavelength grids

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be finite and strictly increasing")]
    UnsortedData,
}

/// Check that a tabulated curve can be interpolated.
///
/// `xs` must be finite and strictly increasing, with at least two samples and
/// one `ys` entry per sample.
pub fn validate_table(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    if xs.iter().any(|x| !x.is_finite()) {
        return Err(InterpError::UnsortedData);
    }

    if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(InterpError::UnsortedData);
    }

    Ok(())
}

/// Performs linear interpolation on 1D data using binary search.
///
/// # Arguments
///
/// * `x` - The x-coordinate at which to interpolate
/// * `xs` - Array of x-coordinates (must be strictly increasing)
/// * `ys` - Array of corresponding y-values (must match length of xs)
///
/// # Returns
///
/// * `Ok(f64)` - The interpolated y-value at position x
/// * `Err(InterpError)` - If the table is malformed or x lies outside it
///
/// # Examples
///
/// ```rust
/// use targets::algo::misc::interp;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let x_coords = vec![0.0, 1.0, 2.0, 3.0];
/// let y_values = vec![0.0, 1.0, 4.0, 9.0];
///
/// let result = interp(1.5, &x_coords, &y_values)?;
/// assert_eq!(result, 2.5);
///
/// let exact = interp(2.0, &x_coords, &y_values)?;
/// assert_eq!(exact, 4.0);
/// # Ok(())
/// # }
/// ```
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    validate_table(xs, ys)?;

    let min_x = xs[0];
    let max_x = xs[xs.len() - 1];

    if !(min_x..=max_x).contains(&x) {
        return Err(InterpError::OutOfBounds(x, min_x, max_x));
    }

    Ok(interp_unchecked(x, xs, ys))
}

/// Linear interpolation on a table already accepted by [`validate_table`].
///
/// Values outside the table range are clamped to the end samples; callers
/// decide what out-of-range means before calling this.
pub(crate) fn interp_unchecked(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    let idx = match xs.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(exact_idx) => return ys[exact_idx],
        Err(insert_idx) => insert_idx,
    };

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);

    let t = (x - x1) / (x2 - x1);
    y1 + t * (y2 - y1)
}

/// `num` logarithmically spaced values from `start` to `stop` inclusive.
///
/// Both ends are reproduced exactly. Requires `start > 0`, `stop > start` and
/// `num >= 2`; the analytic spectrum grids are the only callers.
pub fn logspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let (log_start, log_stop) = (start.log10(), stop.log10());
    let step = (log_stop - log_start) / (num - 1) as f64;

    let mut values: Vec<f64> = (0..num)
        .map(|i| 10f64.powf(log_start + step * i as f64))
        .collect();
    values[0] = start;
    values[num - 1] = stop;
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_match() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![10.0, 20.0, 30.0, 40.0];
        assert_eq!(interp(2.0, &xs, &ys).unwrap(), 20.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys).unwrap(), 15.0);
        assert_eq!(interp(2.5, &xs, &ys).unwrap(), 25.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert!(matches!(
            interp(0.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
        assert!(matches!(
            interp(3.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
    }

    #[test]
    fn test_mismatched_lengths() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0];
        assert_eq!(
            interp(1.5, &xs, &ys),
            Err(InterpError::MismatchedLengths)
        );
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            interp(1.0, &[1.0], &[10.0]),
            Err(InterpError::InsufficientData)
        );
    }

    #[test]
    fn test_unsorted_data() {
        let xs = vec![2.0, 1.0, 3.0];
        let ys = vec![20.0, 10.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys), Err(InterpError::UnsortedData));

        let xs = vec![1.0, f64::NAN, 3.0];
        assert_eq!(interp(1.5, &xs, &ys), Err(InterpError::UnsortedData));
    }

    #[test]
    fn test_unchecked_clamps_to_ends() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp_unchecked(0.0, &xs, &ys), 10.0);
        assert_eq!(interp_unchecked(9.0, &xs, &ys), 30.0);
    }

    #[test]
    fn test_logspace_endpoints_and_ratio() {
        let values = logspace(1000.0, 300000.0, 50);
        assert_eq!(values.len(), 50);
        assert_eq!(values[0], 1000.0);
        assert_eq!(values[49], 300000.0);

        let ratio = values[1] / values[0];
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0]);
            assert_relative_eq!(pair[1] / pair[0], ratio, epsilon = 1e-9);
        }
    }
}

//! Interpolating cubic spline with not-a-knot end conditions.
//!
//! This matches the curve produced by an interpolating (zero smoothing)
//! FITPACK cubic spline, which is how published reddening laws define the
//! optical/infrared part of their curves from a handful of anchor points.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use super::misc::{validate_table, InterpError};

#[derive(Debug, Error)]
pub enum SplineError {
    #[error("Not-a-knot spline needs at least 4 anchor points, got {0}")]
    TooFewPoints(usize),

    #[error("Invalid anchor table: {0}")]
    Table(#[from] InterpError),

    #[error("Spline system is singular")]
    Singular,
}

/// A cubic spline through a fixed set of anchors.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each anchor
    second: Vec<f64>,
}

impl CubicSpline {
    /// Build the spline through `(xs[i], ys[i])`.
    ///
    /// # Arguments
    ///
    /// * `xs` - Anchor positions, strictly increasing
    /// * `ys` - Anchor values
    ///
    /// # Returns
    ///
    /// The spline, or an error if the anchors cannot define one
    pub fn not_a_knot(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, SplineError> {
        validate_table(&xs, &ys)?;
        let n = xs.len();
        if n < 4 {
            return Err(SplineError::TooFewPoints(n));
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let mut system = DMatrix::<f64>::zeros(n, n);
        let mut rhs = DVector::<f64>::zeros(n);

        // Third derivative continuous across the second and second-to-last anchors
        system[(0, 0)] = h[1];
        system[(0, 1)] = -(h[0] + h[1]);
        system[(0, 2)] = h[0];
        system[(n - 1, n - 3)] = h[n - 2];
        system[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        system[(n - 1, n - 1)] = h[n - 3];

        for i in 1..n - 1 {
            system[(i, i - 1)] = h[i - 1];
            system[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            system[(i, i + 1)] = h[i];
            rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        }

        let solution = system.lu().solve(&rhs).ok_or(SplineError::Singular)?;

        Ok(Self {
            xs,
            ys,
            second: solution.iter().copied().collect(),
        })
    }

    /// Evaluate the spline. Outside the anchors the end polynomials are extended.
    pub fn eval(&self, x: f64) -> f64 {
        let last_segment = self.xs.len() - 2;
        let i = match self.xs.binary_search_by(|probe| probe.total_cmp(&x)) {
            Ok(idx) => idx.min(last_segment),
            Err(0) => 0,
            Err(idx) => (idx - 1).min(last_segment),
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let h = x1 - x0;
        let (a, b) = (x1 - x, x - x0);

        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_passes_through_anchors() {
        let xs = vec![0.0, 0.5, 1.3, 2.0, 3.1];
        let ys = vec![1.0, -0.5, 2.0, 0.25, 4.0];
        let spline = CubicSpline::not_a_knot(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(spline.eval(*x), *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_reproduces_cubic_exactly() {
        // Not-a-knot conditions make any cubic polynomial an exact fit
        let f = |x: f64| 0.5 * x.powi(3) - 2.0 * x * x + x - 3.0;
        let xs = vec![-1.0, 0.0, 0.7, 1.5, 2.2, 4.0];
        let ys = xs.iter().map(|&x| f(x)).collect();
        let spline = CubicSpline::not_a_knot(xs, ys).unwrap();

        for x in [-0.5, 0.3, 1.0, 1.9, 3.3] {
            assert_relative_eq!(spline.eval(x), f(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_too_few_points() {
        let result = CubicSpline::not_a_knot(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]);
        assert!(matches!(result, Err(SplineError::TooFewPoints(3))));
    }

    #[test]
    fn test_unsorted_anchors() {
        let result =
            CubicSpline::not_a_knot(vec![0.0, 2.0, 1.0, 3.0], vec![0.0, 1.0, 0.0, 1.0]);
        assert!(matches!(
            result,
            Err(SplineError::Table(InterpError::UnsortedData))
        ));
    }
}

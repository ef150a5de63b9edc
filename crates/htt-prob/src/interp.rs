//! Piecewise-linear interpolation over tabulated data.

use htt_core::{Error, Result};

/// What to return for abscissas outside the tabulated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Return zero outside `[x_0, x_{n-1}]`.
    #[default]
    Zero,
    /// Fail with [`Error::OutOfRange`].
    Error,
}

/// Linear interpolant through strictly increasing nodes.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Build an interpolant, validating the nodes.
    ///
    /// Requires at least two nodes, equal lengths, finite values and strictly
    /// increasing abscissas.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, extrapolation: Extrapolation) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::Validation(format!(
                "interpolation length mismatch: {} nodes vs {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(Error::Validation(format!(
                "interpolation requires at least 2 nodes, got {}",
                xs.len()
            )));
        }
        if let Some(i) = xs.iter().chain(ys.iter()).position(|v| !v.is_finite()) {
            return Err(Error::Validation(format!("non-finite interpolation input at position {i}")));
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::Validation(format!(
                "interpolation nodes must be strictly increasing (x[{}]={} >= x[{}]={})",
                i,
                xs[i],
                i + 1,
                xs[i + 1]
            )));
        }
        Ok(Self { xs, ys, extrapolation })
    }

    /// Node abscissas.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Node values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Lower and upper edges of the tabulated range.
    pub fn range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Interpolated value at `x`.
    pub fn eval(&self, x: f64) -> Result<f64> {
        let (lo, hi) = self.range();
        if !(x >= lo && x <= hi) {
            return match self.extrapolation {
                Extrapolation::Zero => Ok(0.0),
                Extrapolation::Error => Err(Error::OutOfRange { value: x, min: lo, max: hi }),
            };
        }

        // Largest i with xs[i] <= x, clamped so that (i, i + 1) is a segment.
        let i = self.xs.partition_point(|&v| v <= x).saturating_sub(1).min(self.xs.len() - 2);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        Ok(y0 + (x - x0) * (y1 - y0) / (x1 - x0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolates_between_nodes() {
        let it =
            LinearInterpolator::new(vec![1.0, 2.0, 4.0], vec![0.0, 10.0, 30.0], Extrapolation::Zero)
                .unwrap();
        assert_relative_eq!(it.eval(1.5).unwrap(), 5.0);
        assert_relative_eq!(it.eval(3.0).unwrap(), 20.0);
        assert_relative_eq!(it.eval(4.0).unwrap(), 30.0);
        assert_relative_eq!(it.eval(1.0).unwrap(), 0.0);
        assert_eq!(it.xs(), &[1.0, 2.0, 4.0]);
        assert_eq!(it.ys(), &[0.0, 10.0, 30.0]);
    }

    #[test]
    fn test_zero_outside_range() {
        let it = LinearInterpolator::new(vec![1.0, 2.0], vec![3.0, 3.0], Extrapolation::Zero)
            .unwrap();
        assert_eq!(it.eval(0.999).unwrap(), 0.0);
        assert_eq!(it.eval(2.001).unwrap(), 0.0);
        assert_eq!(it.eval(f64::NAN).unwrap(), 0.0);
    }

    #[test]
    fn test_error_outside_range() {
        let it = LinearInterpolator::new(vec![1.0, 2.0], vec![3.0, 3.0], Extrapolation::Error)
            .unwrap();
        assert!(matches!(it.eval(5.0), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_rejects_bad_nodes() {
        assert!(LinearInterpolator::new(vec![1.0], vec![1.0], Extrapolation::Zero).is_err());
        assert!(
            LinearInterpolator::new(vec![1.0, 1.0], vec![1.0, 2.0], Extrapolation::Zero).is_err()
        );
        assert!(
            LinearInterpolator::new(vec![1.0, 2.0], vec![1.0, f64::INFINITY], Extrapolation::Zero)
                .is_err()
        );
    }
}

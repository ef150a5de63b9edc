//! Quadrature over sampled functions.
//!
//! Nodes are given explicitly (tabulated integrands), so these are composite
//! rules rather than adaptive integrators.

use htt_core::{Error, Result};

fn check_lengths(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::Validation(format!(
            "quadrature node/value length mismatch: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

fn check_step(h: f64, i: usize) -> Result<()> {
    if !(h > 0.0) || !h.is_finite() {
        return Err(Error::Validation(format!(
            "quadrature nodes must be strictly increasing, got step {h} at index {i}"
        )));
    }
    Ok(())
}

/// Composite trapezoid rule on arbitrary nodes.
pub fn trapezoid(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    let mut acc = 0.0;
    for i in 1..x.len() {
        let h = x[i] - x[i - 1];
        check_step(h, i)?;
        acc += 0.5 * h * (y[i] + y[i - 1]);
    }
    Ok(acc)
}

/// Composite Simpson rule on irregularly spaced nodes.
///
/// Each pair of adjacent intervals `(h0, h1)` is integrated with the parabola
/// through its three nodes. With an odd number of intervals, Simpson covers
/// the first `n - 2` intervals and the last one is closed with a trapezoid.
/// Fewer than two nodes integrate to zero.
pub fn simpson(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    let n = x.len();
    if n < 2 {
        return Ok(0.0);
    }
    if n == 2 {
        return trapezoid(x, y);
    }

    let n_intervals = n - 1;
    let simpson_end = if n_intervals % 2 == 0 { n - 1 } else { n - 2 };

    let mut acc = 0.0;
    let mut i = 0;
    while i + 2 <= simpson_end {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        check_step(h0, i + 1)?;
        check_step(h1, i + 2)?;

        let hsum = h0 + h1;
        let ratio = h0 / h1;
        acc += hsum / 6.0
            * (y[i] * (2.0 - 1.0 / ratio) + y[i + 1] * hsum * hsum / (h0 * h1)
                + y[i + 2] * (2.0 - ratio));
        i += 2;
    }

    if simpson_end < n - 1 {
        let h = x[n - 1] - x[n - 2];
        check_step(h, n - 1)?;
        acc += 0.5 * h * (y[n - 1] + y[n - 2]);
    }

    Ok(acc)
}

/// Composite Simpson rule on equidistant nodes with spacing `h`.
///
/// Same odd-interval treatment as [`simpson`].
pub fn simpson_uniform(y: &[f64], h: f64) -> Result<f64> {
    let n = y.len();
    if n < 2 {
        return Ok(0.0);
    }
    check_step(h, 1)?;
    if n == 2 {
        return Ok(0.5 * h * (y[0] + y[1]));
    }

    let simpson_end = if (n - 1) % 2 == 0 { n - 1 } else { n - 2 };
    let mut acc = y[0] + y[simpson_end];
    for (k, &v) in y.iter().enumerate().take(simpson_end).skip(1) {
        acc += if k % 2 == 1 { 4.0 * v } else { 2.0 * v };
    }
    let mut total = acc * h / 3.0;

    if simpson_end < n - 1 {
        total += 0.5 * h * (y[n - 1] + y[n - 2]);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| a + (b - a) * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn test_simpson_exact_for_quadratic_on_irregular_nodes() {
        let x = vec![0.0, 0.3, 1.0, 1.2, 2.0];
        let y: Vec<f64> = x.iter().map(|&t| 3.0 * t * t - 2.0 * t + 1.0).collect();
        // ∫_0^2 (3t^2 - 2t + 1) dt = 8 - 4 + 2
        assert_relative_eq!(simpson(&x, &y).unwrap(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_odd_intervals_uses_trailing_trapezoid() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![1.0, 1.0, 1.0, 1.0];
        assert_relative_eq!(simpson(&x, &y).unwrap(), 3.0, epsilon = 1e-14);

        let y_lin: Vec<f64> = x.iter().map(|&t| 2.0 * t).collect();
        assert_relative_eq!(simpson(&x, &y_lin).unwrap(), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_uniform_matches_irregular() {
        let x = linspace(0.0, std::f64::consts::PI, 101);
        let y: Vec<f64> = x.iter().map(|t| t.sin()).collect();
        let h = x[1] - x[0];
        let a = simpson_uniform(&y, h).unwrap();
        let b = simpson(&x, &y).unwrap();
        assert_relative_eq!(a, 2.0, epsilon = 1e-7);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(simpson(&[], &[]).unwrap(), 0.0);
        assert_eq!(simpson(&[1.0], &[5.0]).unwrap(), 0.0);
        assert_relative_eq!(simpson(&[0.0, 2.0], &[1.0, 3.0]).unwrap(), 4.0);
        assert!(simpson(&[0.0, 1.0], &[1.0]).is_err());
        assert!(simpson(&[0.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_trapezoid_linear_exact() {
        let x = vec![0.0, 0.5, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|&t| 3.0 * t + 1.0).collect();
        assert_relative_eq!(trapezoid(&x, &y).unwrap(), 16.5, epsilon = 1e-12);
    }
}

//! Normal distribution utilities.

use htt_core::{Error, Result};

/// `1 / sqrt(2π)`.
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Density of `N(mu, sigma)` at `x`, unchecked for hot loops; `sigma` must be
/// positive.
#[inline]
pub fn kernel(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    INV_SQRT_2PI / sigma * (-0.5 * z * z).exp()
}

/// Probability mass of a Normal distribution within `±num_sigma` of its mean.
///
/// `erf(num_sigma / sqrt(2))`; dividing a truncated convolution by it restores
/// unit normalisation for a constant-width kernel.
pub fn central_mass(num_sigma: f64) -> Result<f64> {
    if !num_sigma.is_finite() || num_sigma <= 0.0 {
        return Err(Error::Validation(format!(
            "num_sigma must be finite and > 0, got {}",
            num_sigma
        )));
    }
    Ok(statrs::function::erf::erf(num_sigma / std::f64::consts::SQRT_2))
}

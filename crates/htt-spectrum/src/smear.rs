//! Gaussian resolution smearing of a sampled spectrum.
//!
//! The kernel width grows with the observable, `sigma(x') = resolution * x'`,
//! and is truncated at `num_sigma` standard deviations around the query
//! point. The truncation is compensated by dividing by the central mass of a
//! constant-width Normal, which is only approximate for a varying width.
//!
//! Two integration strategies are available:
//! - **direct**: kernel weights at the grid nodes inside the window,
//!   integrated with Simpson's rule on the irregular nodes;
//! - **resampled**: the linear interpolant of the grid evaluated on a
//!   uniform grid across the window, integrated with uniform Simpson.
//!
//! The direct path is used when the window holds more than
//! `density_threshold` nodes per sigma.

use std::cell::OnceCell;

use htt_core::{Error, Result};
use htt_prob::{normal, quad, Extrapolation, LinearInterpolator};

use crate::config::{PathSelection, SmearingConfig};
use crate::grid::AdaptiveGrid;

/// Integration strategy used for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolutionPath {
    /// Weighted sum over the grid nodes.
    Direct,
    /// Uniform resampling of the linear interpolant.
    Resampled,
}

/// Convolves an [`AdaptiveGrid`] with a resolution kernel.
#[derive(Debug, Clone, Copy)]
pub struct SmearingConvolver {
    resolution: f64,
    config: SmearingConfig,
}

impl SmearingConvolver {
    /// Convolver for a relative resolution.
    pub fn new(resolution: f64, config: SmearingConfig) -> Result<Self> {
        crate::config::validate_resolution(resolution)?;
        config.validate()?;
        Ok(Self { resolution, config })
    }

    /// Relative resolution.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Smearing settings.
    pub fn config(&self) -> &SmearingConfig {
        &self.config
    }

    /// Integration window `[x - h, x + h]`, `h = num_sigma * resolution * x`.
    pub fn window(&self, x: f64, num_sigma: f64) -> (f64, f64) {
        let half_width = num_sigma * self.resolution * x;
        (x - half_width, x + half_width)
    }

    /// Number of grid nodes inside the integration window.
    pub fn window_count(&self, grid: &AdaptiveGrid, x: f64, num_sigma: f64) -> usize {
        let (lo, hi) = self.window(x, num_sigma);
        grid.window(lo, hi).len()
    }

    /// Strategy the convolver would use at `x`.
    pub fn select_path(&self, grid: &AdaptiveGrid, x: f64, num_sigma: f64) -> ConvolutionPath {
        match self.config.path {
            PathSelection::Direct => ConvolutionPath::Direct,
            PathSelection::Resampled => ConvolutionPath::Resampled,
            PathSelection::Auto => {
                let density = self.window_count(grid, x, num_sigma) as f64 / num_sigma;
                if density > self.config.density_threshold {
                    ConvolutionPath::Direct
                } else {
                    ConvolutionPath::Resampled
                }
            }
        }
    }

    /// Smeared value at `x` with the configured truncation.
    pub fn convolve(&self, grid: &AdaptiveGrid, interpolant: &OnceCell<LinearInterpolator>, x: f64) -> Result<f64> {
        self.convolve_with(grid, interpolant, x, self.config.num_sigma)
    }

    /// Smeared value at `x`, truncating the kernel at `num_sigma`.
    ///
    /// `interpolant` caches the linear interpolant of `grid`; it is built on
    /// first use by the resampled path and must be cleared whenever the grid
    /// changes.
    pub fn convolve_with(
        &self,
        grid: &AdaptiveGrid,
        interpolant: &OnceCell<LinearInterpolator>,
        x: f64,
        num_sigma: f64,
    ) -> Result<f64> {
        if !x.is_finite() || x <= 0.0 {
            return Err(Error::Validation(format!("smearing needs a finite x > 0, got {x}")));
        }
        let norm = normal::central_mass(num_sigma)?;

        let raw = match self.select_path(grid, x, num_sigma) {
            ConvolutionPath::Direct => self.direct(grid, x, num_sigma)?,
            ConvolutionPath::Resampled => {
                let interp = interpolant_of(grid, interpolant)?;
                self.resampled(interp, x, num_sigma)?
            }
        };
        Ok(raw / norm)
    }

    #[inline]
    fn weight(&self, x: f64, x_prime: f64) -> f64 {
        // The kernel width vanishes at x' = 0.
        if x_prime <= 0.0 {
            0.0
        } else {
            normal::kernel(x, x_prime, self.resolution * x_prime)
        }
    }

    fn direct(&self, grid: &AdaptiveGrid, x: f64, num_sigma: f64) -> Result<f64> {
        let (lo, hi) = self.window(x, num_sigma);
        let range = grid.window(lo, hi);
        let nodes = &grid.xs()[range.clone()];
        let weighted: Vec<f64> = nodes
            .iter()
            .zip(&grid.ys()[range])
            .map(|(&xp, &y)| y * self.weight(x, xp))
            .collect();
        quad::simpson(nodes, &weighted)
    }

    fn resampled(&self, interp: &LinearInterpolator, x: f64, num_sigma: f64) -> Result<f64> {
        let (lo, hi) = self.window(x, num_sigma);
        let n = self.config.resample_points;
        let step = (hi - lo) / (n - 1) as f64;
        let mut weighted = Vec::with_capacity(n);
        for j in 0..n {
            let xp = lo + step * j as f64;
            weighted.push(interp.eval(xp)? * self.weight(x, xp));
        }
        quad::simpson_uniform(&weighted, step)
    }
}

/// Linear interpolant of `grid`, built into `cell` on first use.
pub(crate) fn interpolant_of<'a>(
    grid: &AdaptiveGrid,
    cell: &'a OnceCell<LinearInterpolator>,
) -> Result<&'a LinearInterpolator> {
    if let Some(interp) = cell.get() {
        return Ok(interp);
    }
    let interp = LinearInterpolator::new(grid.xs().to_vec(), grid.ys().to_vec(), Extrapolation::Zero)?;
    Ok(cell.get_or_init(|| interp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_grid(lo: f64, hi: f64, n: usize, f: impl Fn(f64) -> f64) -> AdaptiveGrid {
        let xs: Vec<f64> = (0..n).map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64).collect();
        let ys = xs.iter().map(|&x| f(x)).collect();
        AdaptiveGrid::from_samples(xs, ys).unwrap()
    }

    fn convolver(resolution: f64, path: PathSelection) -> SmearingConvolver {
        SmearingConvolver::new(resolution, SmearingConfig { path, ..SmearingConfig::default() }).unwrap()
    }

    #[test]
    fn test_path_selection_by_density() {
        let grid = uniform_grid(100.0, 2000.0, 1901, |_| 1.0);
        let conv = convolver(0.02, PathSelection::Auto);
        // Window at 1000: ±60 GeV holds 121 nodes, ~40 per sigma.
        assert_eq!(conv.window_count(&grid, 1000.0, 3.0), 121);
        assert_eq!(conv.select_path(&grid, 1000.0, 3.0), ConvolutionPath::Direct);
        // At 200: ±12 GeV holds 25 nodes, ~8 per sigma.
        assert_eq!(conv.select_path(&grid, 200.0, 3.0), ConvolutionPath::Resampled);
    }

    #[test]
    fn test_forced_path() {
        let grid = uniform_grid(100.0, 2000.0, 20, |_| 1.0);
        let conv = convolver(0.02, PathSelection::Direct);
        assert_eq!(conv.select_path(&grid, 1000.0, 3.0), ConvolutionPath::Direct);
    }

    #[test]
    fn test_constant_is_preserved_for_small_resolution() {
        let grid = uniform_grid(100.0, 2000.0, 1901, |_| 2.5);
        let cell = OnceCell::new();
        for path in [PathSelection::Direct, PathSelection::Resampled] {
            let conv = convolver(0.01, path);
            let v = conv.convolve_with(&grid, &cell, 1000.0, 3.0).unwrap();
            assert_relative_eq!(v, 2.5, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_zero_outside_grid_domain() {
        let grid = uniform_grid(500.0, 600.0, 11, |_| 1.0);
        let cell = OnceCell::new();
        let conv = convolver(0.01, PathSelection::Resampled);
        assert_eq!(conv.convolve(&grid, &cell, 1500.0).unwrap(), 0.0);
        assert!(cell.get().is_some());
    }

    #[test]
    fn test_invalid_arguments() {
        let grid = uniform_grid(100.0, 200.0, 11, |_| 1.0);
        let cell = OnceCell::new();
        let conv = convolver(0.1, PathSelection::Auto);
        assert!(conv.convolve(&grid, &cell, 0.0).is_err());
        assert!(conv.convolve_with(&grid, &cell, 150.0, 0.0).is_err());
        assert!(SmearingConvolver::new(-0.1, SmearingConfig::default()).is_err());
    }

    #[test]
    fn test_wide_window_ignores_non_positive_abscissas() {
        let grid = uniform_grid(1.0, 100.0, 100, |_| 1.0);
        let cell = OnceCell::new();
        let conv = convolver(0.5, PathSelection::Resampled);
        let v = conv.convolve(&grid, &cell, 10.0).unwrap();
        assert!(v.is_finite() && v > 0.0);
    }
}

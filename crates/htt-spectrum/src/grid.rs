//! Adaptive sampling of a scalar function for piecewise-linear approximation.
//!
//! The builder starts from a uniform grid whose step follows the variation
//! scale of the function, then bisects segments until, on every segment, both
//! the change of the function and the deviation of its midpoint value from
//! the linear interpolation are within a tolerance. The tolerance is a fixed
//! fraction of the span of the function over the seed grid, floored at the
//! rounding noise of its values.

use std::ops::Range;

use htt_core::{Error, Result};

use crate::config::GridConfig;

/// Ordered `(x, f(x))` samples with strictly increasing `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    n_seed: usize,
    tolerance: Option<f64>,
}

impl AdaptiveGrid {
    /// Wrap externally produced samples.
    ///
    /// Requires at least two finite samples with strictly increasing `x`.
    pub fn from_samples(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return Err(Error::Validation(format!(
                "grid needs >= 2 matching samples, got {} x and {} y",
                xs.len(),
                ys.len()
            )));
        }
        for (&x, &y) in xs.iter().zip(&ys) {
            if !y.is_finite() || !x.is_finite() {
                return Err(Error::InvalidFunctionValue { x, value: y });
            }
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::Validation("grid abscissas must be strictly increasing".into()));
        }
        let n_seed = xs.len();
        Ok(Self { xs, ys, n_seed, tolerance: None })
    }

    /// Sample positions.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Function values at [`AdaptiveGrid::xs`].
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// A grid always has at least two samples.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// First and last sample positions.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Absolute tolerance used during refinement, if built adaptively.
    pub fn tolerance(&self) -> Option<f64> {
        self.tolerance
    }

    /// Size of the uniform seed grid.
    pub fn n_seed(&self) -> usize {
        self.n_seed
    }

    /// Number of midpoints inserted by refinement.
    pub fn n_inserted(&self) -> usize {
        self.xs.len() - self.n_seed
    }

    /// Iterate over `(x, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Indices of samples with `lo <= x <= hi`.
    pub fn window(&self, lo: f64, hi: f64) -> Range<usize> {
        let start = self.xs.partition_point(|&x| x < lo);
        let end = self.xs.partition_point(|&x| x <= hi);
        start..end.max(start)
    }
}

/// Builds [`AdaptiveGrid`]s according to a [`GridConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveGridBuilder {
    config: GridConfig,
}

/// Segment awaiting the refinement test: `(x_left, y_left, x_right, y_right)`.
type Segment = (f64, f64, f64, f64);

impl AdaptiveGridBuilder {
    /// Builder with validated settings.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Sample `f` over `[x_min, x_max]`.
    ///
    /// `variation_scale` sets the step of the seed grid. Errors returned by `f`
    /// propagate unchanged; non-finite values fail with
    /// [`Error::InvalidFunctionValue`].
    pub fn build<F>(&self, x_min: f64, x_max: f64, variation_scale: f64, mut f: F) -> Result<AdaptiveGrid>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        if !(x_min.is_finite() && x_max.is_finite()) || x_max <= x_min {
            return Err(Error::DegenerateRange { min: x_min, max: x_max });
        }
        if !(variation_scale.is_finite() && variation_scale > 0.0) {
            return Err(Error::Validation(format!(
                "variation scale must be finite and > 0, got {variation_scale}"
            )));
        }

        let mut eval = |x: f64| -> Result<f64> {
            let value = f(x)?;
            if !value.is_finite() {
                return Err(Error::InvalidFunctionValue { x, value });
            }
            Ok(value)
        };

        let width = x_max - x_min;
        let by_scale = (width / variation_scale).round();
        if by_scale > self.config.max_seed_points as f64 {
            return Err(Error::Validation(format!(
                "variation scale {variation_scale} over a width of {width} needs {by_scale} seed \
                 points, above max_seed_points {}",
                self.config.max_seed_points
            )));
        }
        let n_seed = self.config.min_seed_points.max(by_scale as usize);

        let mut seed_x = Vec::with_capacity(n_seed);
        let mut seed_y = Vec::with_capacity(n_seed);
        for i in 0..n_seed {
            let x = if i + 1 == n_seed {
                x_max
            } else {
                x_min + width * i as f64 / (n_seed - 1) as f64
            };
            seed_x.push(x);
            seed_y.push(eval(x)?);
        }

        let (lo, hi) = seed_y
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
        // Differences at the rounding level of the values cannot be resolved.
        let noise_floor = 16.0 * f64::EPSILON * lo.abs().max(hi.abs());
        let tolerance = (self.config.relative_tolerance * (hi - lo)).max(noise_floor);
        let min_width = self.config.min_segment_fraction * width;

        let mut xs = Vec::with_capacity(2 * n_seed);
        let mut ys = Vec::with_capacity(2 * n_seed);
        xs.push(seed_x[0]);
        ys.push(seed_y[0]);

        let mut subdivisions = 0usize;
        let mut forced = 0usize;
        let mut stack: Vec<Segment> = Vec::new();

        for i in 0..n_seed - 1 {
            stack.push((seed_x[i], seed_y[i], seed_x[i + 1], seed_y[i + 1]));

            // Left endpoint of the popped segment is already emitted; the
            // left half is pushed last so it is examined first.
            while let Some((xl, yl, xr, yr)) = stack.pop() {
                let xm = 0.5 * (xl + xr);
                let ym = eval(xm)?;

                let step = (yr - yl).abs();
                let deviation = (ym - 0.5 * (yl + yr)).abs();
                let needs_split = step > tolerance || deviation > 0.5 * tolerance;
                let can_split = xr - xl > min_width && xm > xl && xm < xr;

                if needs_split && can_split {
                    subdivisions += 1;
                    if subdivisions > self.config.max_subdivisions {
                        return Err(Error::RefinementLimit(self.config.max_subdivisions));
                    }
                    stack.push((xm, ym, xr, yr));
                    stack.push((xl, yl, xm, ym));
                } else {
                    if needs_split {
                        forced += 1;
                    }
                    xs.push(xr);
                    ys.push(yr);
                }
            }
        }

        if forced > 0 {
            log::warn!(
                "adaptive grid: accepted {forced} segment(s) at the minimal width {min_width:.3e} \
                 without meeting tolerance {tolerance:.3e}; the function may be discontinuous"
            );
        }
        log::debug!(
            "adaptive grid on [{x_min}, {x_max}]: {n_seed} seed points, {subdivisions} insertions, \
             tolerance {tolerance:.3e}"
        );

        Ok(AdaptiveGrid { xs, ys, n_seed, tolerance: Some(tolerance) })
    }
}

//! Configuration for grid construction, smearing and the evaluator.
//!
//! All structs deserialize with `#[serde(default)]`, so a JSON document only
//! needs to name the fields it overrides.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use htt_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the adaptive grid builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Fraction of the overall span of the function used as the tolerance.
    pub relative_tolerance: f64,
    /// Lower bound on the number of seed points.
    pub min_seed_points: usize,
    /// Upper bound on the number of seed points implied by the variation scale.
    pub max_seed_points: usize,
    /// Maximal number of midpoint insertions before giving up.
    pub max_subdivisions: usize,
    /// Segments narrower than this fraction of the domain are accepted as is.
    ///
    /// Protects against endless bisection across a discontinuity.
    pub min_segment_fraction: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            relative_tolerance: 0.005,
            min_seed_points: 100,
            max_seed_points: 10_000_000,
            max_subdivisions: 1_000_000,
            min_segment_fraction: 1e-9,
        }
    }
}

impl GridConfig {
    /// Check ranges of all fields.
    pub fn validate(&self) -> Result<()> {
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance > 0.0) {
            return Err(Error::Validation(format!(
                "relative_tolerance must be finite and > 0, got {}",
                self.relative_tolerance
            )));
        }
        if self.min_seed_points < 2 {
            return Err(Error::Validation(format!(
                "min_seed_points must be >= 2, got {}",
                self.min_seed_points
            )));
        }
        if self.max_seed_points < self.min_seed_points {
            return Err(Error::Validation(format!(
                "max_seed_points ({}) must be >= min_seed_points ({})",
                self.max_seed_points, self.min_seed_points
            )));
        }
        if !(self.min_segment_fraction >= 0.0 && self.min_segment_fraction < 1.0) {
            return Err(Error::Validation(format!(
                "min_segment_fraction must be in [0, 1), got {}",
                self.min_segment_fraction
            )));
        }
        Ok(())
    }
}

/// How the convolver picks its integration strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSelection {
    /// Choose by the number of grid nodes inside the kernel window.
    #[default]
    Auto,
    /// Always weight the grid nodes directly.
    Direct,
    /// Always resample the linear interpolant on a uniform grid.
    Resampled,
}

/// Parameters of the Gaussian smearing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmearingConfig {
    /// Kernel truncation in units of its standard deviation.
    pub num_sigma: f64,
    /// Minimal grid nodes per sigma for the direct path.
    pub density_threshold: f64,
    /// Uniform nodes used by the resampling path.
    pub resample_points: usize,
    /// Strategy override.
    pub path: PathSelection,
}

impl Default for SmearingConfig {
    fn default() -> Self {
        Self { num_sigma: 3.0, density_threshold: 20.0, resample_points: 101, path: PathSelection::Auto }
    }
}

impl SmearingConfig {
    /// Check ranges of all fields.
    pub fn validate(&self) -> Result<()> {
        if !(self.num_sigma.is_finite() && self.num_sigma > 0.0) {
            return Err(Error::Validation(format!(
                "num_sigma must be finite and > 0, got {}",
                self.num_sigma
            )));
        }
        if !(self.density_threshold >= 0.0) {
            return Err(Error::Validation(format!(
                "density_threshold must be >= 0, got {}",
                self.density_threshold
            )));
        }
        if self.resample_points < 3 {
            return Err(Error::Validation(format!(
                "resample_points must be >= 3, got {}",
                self.resample_points
            )));
        }
        Ok(())
    }
}

/// Top-level evaluator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Parton-level mtt domain of the grid, GeV.
    pub domain: (f64, f64),
    /// Relative mtt resolution.
    pub resolution: f64,
    /// Multiplier of the default renormalisation scale `mtt / 2`.
    pub renormalization_scale_factor: f64,
    /// Grid builder settings.
    pub grid: GridConfig,
    /// Smearing settings.
    pub smearing: SmearingConfig,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            domain: (340.0, 2000.0),
            resolution: 0.2,
            renormalization_scale_factor: 1.0,
            grid: GridConfig::default(),
            smearing: SmearingConfig::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a JSON file and validate.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let cfg: Self = serde_json::from_reader(BufReader::new(file))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check ranges of all fields.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.domain;
        if !(lo.is_finite() && hi.is_finite()) || hi <= lo {
            return Err(Error::DegenerateRange { min: lo, max: hi });
        }
        if lo <= 0.0 {
            return Err(Error::Validation(format!("domain must be at positive mtt, got {lo}")));
        }
        validate_resolution(self.resolution)?;
        validate_scale_factor(self.renormalization_scale_factor)?;
        self.grid.validate()?;
        self.smearing.validate()
    }
}

pub(crate) fn validate_resolution(resolution: f64) -> Result<()> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::Validation(format!(
            "resolution must be finite and > 0, got {resolution}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_scale_factor(factor: f64) -> Result<()> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(Error::Validation(format!(
            "renormalization scale factor must be finite and > 0, got {factor}"
        )));
    }
    Ok(())
}

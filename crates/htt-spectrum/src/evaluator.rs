//! Un-smeared and smeared mtt spectra for one parameter point.

use std::cell::OnceCell;
use std::sync::Arc;

use htt_core::traits::{CrossSectionModel, PartonLuminosity, SelectionEfficiency, StrongCoupling};
use htt_core::{Error, Result, Subprocess};
use htt_prob::LinearInterpolator;

use crate::config::{self, EvaluatorConfig, SmearingConfig};
use crate::grid::{AdaptiveGrid, AdaptiveGridBuilder};
use crate::smear::{ConvolutionPath, SmearingConvolver};

/// Cached samples of the un-smeared spectrum.
#[derive(Debug, Default)]
enum GridCache {
    /// Nothing cached; the next smeared query rebuilds.
    #[default]
    Stale,
    /// Grid for the current configuration and its lazily built interpolant.
    Built { grid: AdaptiveGrid, interpolant: OnceCell<LinearInterpolator> },
}

/// Evaluates the differential cross section in parton-level mtt and its
/// convolution with the detector resolution.
///
/// The model, luminosity, coupling and efficiency are shared read-only
/// collaborators. The evaluator owns an adaptive grid of the un-smeared
/// spectrum, built on the first smeared query and dropped whenever an input
/// of the un-smeared spectrum or the resolution changes.
pub struct SpectrumEvaluator {
    model: Arc<dyn CrossSectionModel>,
    luminosity: Arc<dyn PartonLuminosity>,
    alpha_s: Arc<dyn StrongCoupling>,
    efficiency: Arc<dyn SelectionEfficiency>,
    config: EvaluatorConfig,
    convolver: SmearingConvolver,
    cache: GridCache,
}

impl std::fmt::Debug for SpectrumEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumEvaluator")
            .field("config", &self.config)
            .field("stale", &self.is_stale())
            .finish_non_exhaustive()
    }
}

impl SpectrumEvaluator {
    /// Create an evaluator with a validated configuration.
    pub fn new(
        model: Arc<dyn CrossSectionModel>,
        luminosity: Arc<dyn PartonLuminosity>,
        alpha_s: Arc<dyn StrongCoupling>,
        efficiency: Arc<dyn SelectionEfficiency>,
        config: EvaluatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let convolver = SmearingConvolver::new(config.resolution, config.smearing)?;
        Ok(Self { model, luminosity, alpha_s, efficiency, config, convolver, cache: GridCache::Stale })
    }

    /// Active cross-section model.
    pub fn model(&self) -> &Arc<dyn CrossSectionModel> {
        &self.model
    }

    /// Current configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Relative mtt resolution.
    pub fn resolution(&self) -> f64 {
        self.config.resolution
    }

    /// Multiplier of the default renormalisation scale.
    pub fn renormalization_scale_factor(&self) -> f64 {
        self.config.renormalization_scale_factor
    }

    /// Whether the next smeared query will rebuild the grid.
    pub fn is_stale(&self) -> bool {
        matches!(self.cache, GridCache::Stale)
    }

    /// Cached grid, if any.
    pub fn grid(&self) -> Option<&AdaptiveGrid> {
        match &self.cache {
            GridCache::Stale => None,
            GridCache::Built { grid, .. } => Some(grid),
        }
    }

    fn invalidate(&mut self) {
        if !self.is_stale() {
            log::debug!("spectrum grid invalidated");
        }
        self.cache = GridCache::Stale;
    }

    /// Replace the cross-section model.
    pub fn set_model(&mut self, model: Arc<dyn CrossSectionModel>) {
        self.model = model;
        self.invalidate();
    }

    /// Replace the selection efficiency.
    pub fn set_efficiency(&mut self, efficiency: Arc<dyn SelectionEfficiency>) {
        self.efficiency = efficiency;
        self.invalidate();
    }

    /// Set the renormalisation scale to `factor * mtt / 2`.
    pub fn set_renormalization_scale_factor(&mut self, factor: f64) -> Result<()> {
        config::validate_scale_factor(factor)?;
        self.config.renormalization_scale_factor = factor;
        self.invalidate();
        Ok(())
    }

    /// Set the relative mtt resolution.
    pub fn set_resolution(&mut self, resolution: f64) -> Result<()> {
        self.convolver = SmearingConvolver::new(resolution, self.config.smearing)?;
        self.config.resolution = resolution;
        self.invalidate();
        Ok(())
    }

    /// Change the smearing settings. The grid is kept.
    pub fn set_smearing(&mut self, smearing: SmearingConfig) -> Result<()> {
        self.convolver = SmearingConvolver::new(self.config.resolution, smearing)?;
        self.config.smearing = smearing;
        Ok(())
    }

    /// Differential cross section `dσ/dmtt` at parton-level `mtt`, pb/GeV.
    ///
    /// Both subprocesses are weighted with their selection efficiencies and
    /// multiplied by the parton luminosity at `s = mtt^2` and the Jacobian
    /// `ds/dmtt = 2 mtt`. The strong coupling is taken at
    /// `factor * mtt / 2`.
    pub fn unsmeared(&self, mtt: f64) -> Result<f64> {
        if !mtt.is_finite() || mtt <= 0.0 {
            return Err(Error::Validation(format!("mtt must be finite and > 0, got {mtt}")));
        }
        let s = mtt * mtt;
        let scale = mtt / 2.0 * self.config.renormalization_scale_factor;
        let alpha_s = self.alpha_s.alpha_s(scale)?;

        let resonant = self.model.resonant(s, alpha_s)?
            * self.efficiency.efficiency(mtt, Subprocess::Resonant)?;
        let interference = self.model.interference(s, alpha_s)?
            * self.efficiency.efficiency(mtt, Subprocess::Interference)?;

        Ok((resonant + interference) * self.luminosity.luminosity(s)? * 2.0 * mtt)
    }

    /// Rebuild the grid with the configured tolerance.
    pub fn build_grid(&mut self) -> Result<()> {
        self.build_grid_with_tolerance(self.config.grid.relative_tolerance)
    }

    /// Rebuild the grid with an explicit relative tolerance.
    ///
    /// On failure the cache is left stale.
    pub fn build_grid_with_tolerance(&mut self, relative_tolerance: f64) -> Result<()> {
        self.cache = GridCache::Stale;

        let builder = AdaptiveGridBuilder::new(config::GridConfig { relative_tolerance, ..self.config.grid })?;
        let variation_scale = self.model.variation_scale()?;
        let (lo, hi) = self.config.domain;
        let grid = builder.build(lo, hi, variation_scale, |x| self.unsmeared(x))?;

        log::debug!(
            "spectrum grid built: {} points ({} inserted), variation scale {variation_scale} GeV",
            grid.len(),
            grid.n_inserted()
        );
        self.cache = GridCache::Built { grid, interpolant: OnceCell::new() };
        Ok(())
    }

    fn built(&mut self) -> Result<(&AdaptiveGrid, &OnceCell<LinearInterpolator>)> {
        if self.is_stale() {
            self.build_grid()?;
        }
        match &self.cache {
            GridCache::Built { grid, interpolant } => Ok((grid, interpolant)),
            GridCache::Stale => Err(Error::NotConfigured("spectrum grid is not built".into())),
        }
    }

    /// Smeared cross section at reconstructed `mtt`, pb/GeV.
    ///
    /// Builds the grid first if it is stale.
    pub fn smeared(&mut self, mtt: f64) -> Result<f64> {
        self.smeared_with(mtt, self.config.smearing.num_sigma)
    }

    /// Same as [`SpectrumEvaluator::smeared`] with an explicit kernel
    /// truncation.
    pub fn smeared_with(&mut self, mtt: f64, num_sigma: f64) -> Result<f64> {
        let convolver = self.convolver;
        let (grid, interpolant) = self.built()?;
        convolver.convolve_with(grid, interpolant, mtt, num_sigma)
    }

    /// Integration strategy a smeared query at `mtt` would use.
    pub fn path_at(&mut self, mtt: f64) -> Result<ConvolutionPath> {
        let convolver = self.convolver;
        let num_sigma = self.config.smearing.num_sigma;
        let (grid, _) = self.built()?;
        Ok(convolver.select_path(grid, mtt, num_sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha_s::FixedAlphaS;
    use crate::efficiency::UnitEfficiency;

    struct Flat;

    impl CrossSectionModel for Flat {
        fn resonant(&self, _s: f64, alpha_s: f64) -> Result<f64> {
            Ok(alpha_s)
        }

        fn interference(&self, _s: f64, _alpha_s: f64) -> Result<f64> {
            Ok(-0.25)
        }

        fn variation_scale(&self) -> Result<f64> {
            Ok(100.0)
        }
    }

    struct Unit;

    impl PartonLuminosity for Unit {
        fn luminosity(&self, _s: f64) -> Result<f64> {
            Ok(1.0)
        }
    }

    struct LinearScale;

    impl StrongCoupling for LinearScale {
        fn alpha_s(&self, q: f64) -> Result<f64> {
            Ok(q)
        }
    }

    fn evaluator(alpha_s: Arc<dyn StrongCoupling>) -> SpectrumEvaluator {
        SpectrumEvaluator::new(
            Arc::new(Flat),
            Arc::new(Unit),
            alpha_s,
            Arc::new(UnitEfficiency),
            EvaluatorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_unsmeared_composition() {
        let ev = evaluator(Arc::new(FixedAlphaS(1.25)));
        // (1.25 - 0.25) * 1 * 2 * 500
        assert_eq!(ev.unsmeared(500.0).unwrap(), 1000.0);
    }

    #[test]
    fn test_renormalization_scale() {
        let mut ev = evaluator(Arc::new(LinearScale));
        // alpha_s = 600 / 2 = 300
        assert_eq!(ev.unsmeared(600.0).unwrap(), (300.0 - 0.25) * 1200.0);
        ev.set_renormalization_scale_factor(2.0).unwrap();
        assert_eq!(ev.unsmeared(600.0).unwrap(), (600.0 - 0.25) * 1200.0);
        assert!(ev.set_renormalization_scale_factor(0.0).is_err());
        assert_eq!(ev.renormalization_scale_factor(), 2.0);
    }

    #[test]
    fn test_lazy_build_and_invalidation() {
        let mut ev = evaluator(Arc::new(FixedAlphaS(0.1)));
        assert!(ev.is_stale());
        ev.smeared(800.0).unwrap();
        assert!(!ev.is_stale());
        assert_eq!(ev.grid().unwrap().domain(), (340.0, 2000.0));

        ev.set_smearing(SmearingConfig { num_sigma: 4.0, ..SmearingConfig::default() }).unwrap();
        assert!(!ev.is_stale());

        ev.set_resolution(0.1).unwrap();
        assert!(ev.is_stale());
        assert!(ev.set_resolution(-1.0).is_err());
        assert_eq!(ev.resolution(), 0.1);
    }

    #[test]
    fn test_unsmeared_rejects_non_positive() {
        let ev = evaluator(Arc::new(FixedAlphaS(0.1)));
        assert!(matches!(ev.unsmeared(0.0), Err(Error::Validation(_))));
    }
}

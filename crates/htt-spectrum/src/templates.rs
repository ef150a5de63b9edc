//! Binned signal templates from the smeared spectrum.

use htt_core::{Error, Result};
use htt_prob::quad;
use serde::{Deserialize, Serialize};

use crate::evaluator::SpectrumEvaluator;

/// Samples per bin used by [`SignalTemplates::build`].
pub const DEFAULT_SAMPLES_PER_BIN: usize = 10;

/// Integrate the smeared spectrum over each bin of `edges`.
///
/// Every bin is sampled at `samples_per_bin` equidistant points including
/// its edges and integrated with the trapezoid rule.
pub fn integrate_bins(evaluator: &mut SpectrumEvaluator, edges: &[f64], samples_per_bin: usize) -> Result<Vec<f64>> {
    if edges.len() < 2 {
        return Err(Error::Validation(format!("need at least 2 bin edges, got {}", edges.len())));
    }
    if let Some(i) = edges.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(Error::Validation(format!("bin edges must be strictly increasing at index {}", i + 1)));
    }
    if samples_per_bin < 2 {
        return Err(Error::Validation(format!("samples_per_bin must be >= 2, got {samples_per_bin}")));
    }

    let mut x = vec![0.0; samples_per_bin];
    let mut y = vec![0.0; samples_per_bin];
    let mut out = Vec::with_capacity(edges.len() - 1);
    for bin in edges.windows(2) {
        let (lo, hi) = (bin[0], bin[1]);
        for k in 0..samples_per_bin {
            x[k] = if k + 1 == samples_per_bin {
                hi
            } else {
                lo + (hi - lo) * k as f64 / (samples_per_bin - 1) as f64
            };
            y[k] = evaluator.smeared(x[k])?;
        }
        out.push(quad::trapezoid(&x, &y)?);
    }
    Ok(out)
}

/// Renormalisation-scale variation of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleVariation {
    /// Default scale `mtt / 2`.
    Nominal,
    /// Scale doubled.
    Up,
    /// Scale halved.
    Down,
}

impl ScaleVariation {
    /// All variations, nominal first.
    pub const ALL: [ScaleVariation; 3] = [ScaleVariation::Nominal, ScaleVariation::Up, ScaleVariation::Down];

    /// Multiplier applied to the nominal scale.
    pub fn factor(self) -> f64 {
        match self {
            ScaleVariation::Nominal => 1.0,
            ScaleVariation::Up => 2.0,
            ScaleVariation::Down => 0.5,
        }
    }

    /// Suffix appended to template names.
    pub fn suffix(self) -> &'static str {
        match self {
            ScaleVariation::Nominal => "",
            ScaleVariation::Up => "_RenormScaleUp",
            ScaleVariation::Down => "_RenormScaleDown",
        }
    }
}

/// Bin contents split by sign.
///
/// Negative contents are stored with flipped sign, so both parts are
/// non-negative; the negative part enters a fit with a negated signal
/// strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTemplate {
    /// Variation this template was built with.
    pub variation: ScaleVariation,
    /// Non-negative bin contents, zero where the integral is negative.
    pub positive: Vec<f64>,
    /// Flipped negative bin contents, zero where the integral is non-negative.
    pub negative: Vec<f64>,
}

impl SignedTemplate {
    /// Split raw bin integrals by sign.
    pub fn from_integrals(variation: ScaleVariation, integrals: &[f64]) -> Self {
        let positive = integrals.iter().map(|&v| if v >= 0.0 { v } else { 0.0 }).collect();
        let negative = integrals.iter().map(|&v| if v < 0.0 { -v } else { 0.0 }).collect();
        Self { variation, positive, negative }
    }

    /// Signed bin contents, `positive - negative`.
    pub fn net(&self) -> Vec<f64> {
        self.positive.iter().zip(&self.negative).map(|(p, n)| p - n).collect()
    }

    /// Name of the positive part, e.g. `SgnPos_RenormScaleUp`.
    pub fn positive_name(&self) -> String {
        format!("SgnPos{}", self.variation.suffix())
    }

    /// Name of the negative part.
    pub fn negative_name(&self) -> String {
        format!("SgnNeg{}", self.variation.suffix())
    }
}

/// Signal templates for all renormalisation-scale variations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTemplates {
    /// Bin edges in reconstructed mtt.
    pub edges: Vec<f64>,
    /// One template per variation, in [`ScaleVariation::ALL`] order.
    pub templates: Vec<SignedTemplate>,
}

impl SignalTemplates {
    /// Build the nominal and scale-varied templates.
    ///
    /// The evaluator's scale factor is restored afterwards, also on error.
    pub fn build(evaluator: &mut SpectrumEvaluator, edges: &[f64]) -> Result<Self> {
        Self::build_with_samples(evaluator, edges, DEFAULT_SAMPLES_PER_BIN)
    }

    /// Same as [`SignalTemplates::build`] with an explicit sampling density.
    pub fn build_with_samples(evaluator: &mut SpectrumEvaluator, edges: &[f64], samples_per_bin: usize) -> Result<Self> {
        let original = evaluator.renormalization_scale_factor();
        let result = Self::build_inner(evaluator, edges, samples_per_bin, original);
        if evaluator.renormalization_scale_factor() != original {
            evaluator.set_renormalization_scale_factor(original)?;
        }
        result
    }

    fn build_inner(
        evaluator: &mut SpectrumEvaluator,
        edges: &[f64],
        samples_per_bin: usize,
        base_factor: f64,
    ) -> Result<Self> {
        let mut templates = Vec::with_capacity(ScaleVariation::ALL.len());
        for variation in ScaleVariation::ALL {
            let factor = base_factor * variation.factor();
            if evaluator.renormalization_scale_factor() != factor {
                evaluator.set_renormalization_scale_factor(factor)?;
            }
            let integrals = integrate_bins(evaluator, edges, samples_per_bin)?;
            templates.push(SignedTemplate::from_integrals(variation, &integrals));
        }
        Ok(Self { edges: edges.to_vec(), templates })
    }

    /// Template for one variation.
    pub fn get(&self, variation: ScaleVariation) -> Option<&SignedTemplate> {
        self.templates.iter().find(|t| t.variation == variation)
    }

    /// Nominal template.
    pub fn nominal(&self) -> Option<&SignedTemplate> {
        self.get(ScaleVariation::Nominal)
    }
}

//! Selection efficiencies for the l+jets final state.

use htt_core::traits::SelectionEfficiency;
use htt_core::{Error, Result, Subprocess};
use serde::{Deserialize, Serialize};

/// Branching ratio of tt to l+jets with l = e, mu.
pub const LJETS_BRANCHING: f64 = 8.0 / 27.0;

/// Efficiency parameterised as a polynomial in `ln(mtt)`, times the branching
/// ratio of the targeted decays.
///
/// Coefficients are ordered from the highest power down, as produced by a
/// least-squares polynomial fit. Lepton identification and b-tagging
/// efficiencies are not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPolynomialEfficiency {
    /// Coefficients for the resonant part.
    pub resonant: Vec<f64>,
    /// Coefficients for the interference.
    pub interference: Vec<f64>,
    /// Branching ratio multiplying the polynomial.
    #[serde(default = "default_branching")]
    pub branching: f64,
}

fn default_branching() -> f64 {
    LJETS_BRANCHING
}

impl Default for LogPolynomialEfficiency {
    /// Log-cubic fit for the reference l+jets selection.
    fn default() -> Self {
        Self {
            resonant: vec![-0.116_685_7, 2.199_171_17, -13.589_900_87, 27.783_326_92],
            interference: vec![-0.058_778_67, 1.036_607_73, -5.915_170_33, 11.113_363_88],
            branching: LJETS_BRANCHING,
        }
    }
}

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

impl SelectionEfficiency for LogPolynomialEfficiency {
    fn efficiency(&self, mtt: f64, subprocess: Subprocess) -> Result<f64> {
        if !mtt.is_finite() || mtt <= 0.0 {
            return Err(Error::Validation(format!("efficiency needs mtt > 0, got {mtt}")));
        }
        let coeffs = match subprocess {
            Subprocess::Resonant => &self.resonant,
            Subprocess::Interference => &self.interference,
        };
        Ok(polyval(coeffs, mtt.ln()) * self.branching)
    }
}

/// Efficiency of one for every subprocess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEfficiency;

impl SelectionEfficiency for UnitEfficiency {
    fn efficiency(&self, _mtt: f64, _subprocess: Subprocess) -> Result<f64> {
        Ok(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polyval_highest_power_first() {
        assert_relative_eq!(polyval(&[2.0, -3.0, 1.0], 2.0), 3.0);
        assert_eq!(polyval(&[], 5.0), 0.0);
    }

    #[test]
    fn test_reference_efficiency_is_plausible() {
        let eff = LogPolynomialEfficiency::default();
        for mtt in [400.0, 700.0, 1000.0] {
            for sp in [Subprocess::Resonant, Subprocess::Interference] {
                let e = eff.efficiency(mtt, sp).unwrap();
                assert!(e > 0.0 && e < LJETS_BRANCHING, "mtt={mtt}, {sp}: {e}");
            }
        }
    }

    #[test]
    fn test_label_lookup() {
        let eff = LogPolynomialEfficiency::default();
        let by_enum = eff.efficiency(500.0, Subprocess::Resonant).unwrap();
        assert_eq!(eff.efficiency_for_label(500.0, "Res").unwrap(), by_enum);
        assert!(matches!(
            eff.efficiency_for_label(500.0, "Bkg"),
            Err(Error::UnrecognizedSubprocess(_))
        ));
    }

    #[test]
    fn test_deserialize_with_default_branching() {
        let json = r#"{"resonant": [0.1], "interference": [0.2]}"#;
        let eff: LogPolynomialEfficiency = serde_json::from_str(json).unwrap();
        assert_relative_eq!(eff.efficiency(600.0, Subprocess::Interference).unwrap(), 0.2 * 8.0 / 27.0);
    }
}

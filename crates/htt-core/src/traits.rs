//! Core traits for htt
//!
//! The spectrum engine is written against these capabilities only. Concrete
//! physics models, PDF luminosity tables, strong-coupling evaluators and
//! efficiency parameterisations live in other crates (or in the caller) and
//! are shared with the engine as read-only collaborators.

use crate::{Error, Result, Subprocess};

/// Parton-level cross section for gg -> S -> tt.
///
/// Both components are functions of the Mandelstam `s` (GeV^2) and the strong
/// coupling, returned in pb. By convention they vanish below the tt production
/// threshold. Implementations must be pure: no interior mutation that changes
/// the returned values.
pub trait CrossSectionModel: Send + Sync {
    /// Resonant component `|A_S|^2`, in pb.
    fn resonant(&self, s: f64, alpha_s: f64) -> Result<f64>;

    /// Interference with the SM background, in pb. May be negative.
    fn interference(&self, s: f64, alpha_s: f64) -> Result<f64>;

    /// Typical change in `sqrt(s)`, in GeV, over which the cross section can
    /// change substantially.
    ///
    /// A uniform grid with this step is expected to resolve every feature of
    /// the spectrum. Models that never set it fail with
    /// [`Error::NotConfigured`].
    fn variation_scale(&self) -> Result<f64> {
        Err(Error::NotConfigured("variation_scale must be set by the model".into()))
    }

    /// Sum of both components.
    fn total(&self, s: f64, alpha_s: f64) -> Result<f64> {
        Ok(self.resonant(s, alpha_s)? + self.interference(s, alpha_s)?)
    }
}

/// Parton luminosity: PDF convolution as a function of parton-level `s`.
pub trait PartonLuminosity: Send + Sync {
    /// Convolution factor at `s` (GeV^2).
    fn luminosity(&self, s: f64) -> Result<f64>;
}

/// Strong coupling constant as a function of the renormalisation scale.
pub trait StrongCoupling: Send + Sync {
    /// `alpha_s(Q)` with `Q` in GeV.
    fn alpha_s(&self, q: f64) -> Result<f64>;
}

/// Event selection efficiency, including the branching ratio for the
/// targeted decays.
pub trait SelectionEfficiency: Send + Sync {
    /// Efficiency at parton-level `mtt` (GeV) for one subprocess.
    fn efficiency(&self, mtt: f64, subprocess: Subprocess) -> Result<f64>;

    /// Same as [`SelectionEfficiency::efficiency`], keyed by a text label.
    ///
    /// Labels other than `"Res"` and `"Int"` fail with
    /// [`Error::UnrecognizedSubprocess`].
    fn efficiency_for_label(&self, mtt: f64, label: &str) -> Result<f64> {
        self.efficiency(mtt, label.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unconfigured;

    impl CrossSectionModel for Unconfigured {
        fn resonant(&self, _s: f64, _alpha_s: f64) -> Result<f64> {
            Ok(2.0)
        }

        fn interference(&self, _s: f64, _alpha_s: f64) -> Result<f64> {
            Ok(-0.5)
        }
    }

    struct Flat;

    impl SelectionEfficiency for Flat {
        fn efficiency(&self, _mtt: f64, subprocess: Subprocess) -> Result<f64> {
            Ok(match subprocess {
                Subprocess::Resonant => 0.3,
                Subprocess::Interference => 0.2,
            })
        }
    }

    #[test]
    fn test_missing_variation_scale_is_not_configured() {
        let err = Unconfigured.variation_scale().unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[test]
    fn test_total_sums_components() {
        assert_eq!(Unconfigured.total(1.0e6, 0.1).unwrap(), 1.5);
    }

    #[test]
    fn test_efficiency_label_dispatch() {
        assert_eq!(Flat.efficiency_for_label(500.0, "Int").unwrap(), 0.2);
        assert!(matches!(
            Flat.efficiency_for_label(500.0, "Bkg"),
            Err(Error::UnrecognizedSubprocess(_))
        ));
    }
}

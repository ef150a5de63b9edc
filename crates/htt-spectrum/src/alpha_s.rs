//! Strong coupling evaluators.

use std::f64::consts::PI;

use htt_core::traits::StrongCoupling;
use htt_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mass of the Z boson, GeV.
pub const M_Z: f64 = 91.1876;

/// `alpha_s(M_Z)` of the PDF4LHC15 sets.
pub const ALPHA_S_MZ: f64 = 0.118;

/// Scale-independent coupling, useful for tests and quick estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedAlphaS(pub f64);

impl StrongCoupling for FixedAlphaS {
    fn alpha_s(&self, _q: f64) -> Result<f64> {
        Ok(self.0)
    }
}

/// Two-loop running coupling with a fixed number of active flavours.
///
/// Uses the standard NLO approximate solution of the RGE around `M_Z`:
/// `a = a0 / X * (1 - b1/b0 * a0 ln X / X)`, `X = 1 + b0 a0 ln(Q^2/M_Z^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningAlphaS {
    /// Coupling at the Z pole.
    pub alpha_s_mz: f64,
    /// Active quark flavours.
    pub n_flavours: u32,
}

impl Default for RunningAlphaS {
    fn default() -> Self {
        Self { alpha_s_mz: ALPHA_S_MZ, n_flavours: 5 }
    }
}

impl RunningAlphaS {
    fn beta0(&self) -> f64 {
        (33.0 - 2.0 * f64::from(self.n_flavours)) / (12.0 * PI)
    }

    fn beta1(&self) -> f64 {
        (153.0 - 19.0 * f64::from(self.n_flavours)) / (24.0 * PI * PI)
    }
}

impl StrongCoupling for RunningAlphaS {
    fn alpha_s(&self, q: f64) -> Result<f64> {
        if !q.is_finite() || q <= 0.0 {
            return Err(Error::Validation(format!("alpha_s scale must be finite and > 0, got {q}")));
        }
        let a0 = self.alpha_s_mz;
        let (b0, b1) = (self.beta0(), self.beta1());
        let x = 1.0 + b0 * a0 * (q * q / (M_Z * M_Z)).ln();
        if x <= 0.0 {
            return Err(Error::Validation(format!(
                "alpha_s scale {q} GeV is below the Landau pole of the running coupling"
            )));
        }
        Ok(a0 / x * (1.0 - b1 / b0 * a0 * x.ln() / x))
    }
}

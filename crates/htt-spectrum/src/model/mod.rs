//! Parton-level cross-section models for gg -> S -> tt.
//!
//! Every model is a plain value built from its own parameters and implements
//! [`htt_core::traits::CrossSectionModel`]. The formulas follow the leading
//! order expressions of Dicus et al. (hep-ph/9404359) with fixed widths and
//! naive k-factors for higher orders.

use std::fmt;
use std::str::FromStr;

use htt_core::Error;
use serde::{Deserialize, Serialize};

pub mod loops;
mod mssm;
mod two_hdm;
mod vlq;

pub use mssm::{MssmStopModel, StopSquark};
pub use two_hdm::{Component, ComponentSet, ScalarState, TwoHdmModel};
pub use vlq::VlqModel;

/// Mass of the top quark, GeV.
pub const M_TOP: f64 = 173.0;

/// Fermi constant, GeV^-2.
pub const G_FERMI: f64 = 1.166_390e-5;

/// `GeV^-2` expressed in pb is `1 / GEV2_IN_PB_INV`.
const GEV2_IN_PB_INV: f64 = 2.56819e-9;

/// Naive NLO k-factor for gg -> A/H.
pub const K_RESONANT: f64 = 2.0;

/// Naive k-factor for the SM gg -> tt background.
pub const K_BACKGROUND: f64 = 1.6;

/// Convert a cross section from GeV^-2 to pb.
#[inline]
pub fn to_pb(xsec: f64) -> f64 {
    xsec / GEV2_IN_PB_INV
}

/// Velocity of the top quarks in the tt rest frame at parton-level `s`.
///
/// Callers must check that `s` is above the tt threshold.
#[inline]
pub fn beta(s: f64) -> f64 {
    (1.0 - 4.0 * M_TOP * M_TOP / s).sqrt()
}

/// Whether `s` is at or below the tt production threshold.
#[inline]
pub fn below_threshold(s: f64) -> bool {
    s <= 4.0 * M_TOP * M_TOP
}

/// Default k-factor for the interference: geometric mean of the resonant and
/// background ones (Hespel et al., arXiv:1606.04149).
pub fn default_k_interference() -> f64 {
    (K_RESONANT * K_BACKGROUND).sqrt()
}

/// CP state of a heavy neutral scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CpState {
    /// Pseudoscalar `A`.
    #[serde(rename = "A")]
    Odd,
    /// Scalar `H`.
    #[serde(rename = "H")]
    Even,
}

impl CpState {
    /// Power of `β` in the tt decay rate (p-wave for CP-even).
    pub fn beta_power(self) -> i32 {
        match self {
            CpState::Odd => 1,
            CpState::Even => 3,
        }
    }
}

impl fmt::Display for CpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CpState::Odd => "A",
            CpState::Even => "H",
        })
    }
}

impl FromStr for CpState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(CpState::Odd),
            "H" => Ok(CpState::Even),
            other => Err(Error::Validation(format!("Cannot recognize CP state \"{other}\""))),
        }
    }
}

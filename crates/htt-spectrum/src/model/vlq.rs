use std::f64::consts::{PI, SQRT_2};

use htt_core::traits::CrossSectionModel;
use htt_core::{Error, Result};
use num_complex::Complex64;

use super::loops::{fermion_loop, running_width_tt, width_tt};
use super::{
    CpState, G_FERMI, K_RESONANT, M_TOP, below_threshold, beta, default_k_interference, to_pb,
};

/// gg -> S -> tt with vector-like quarks in the production loop.
///
/// A single heavy scalar of fixed CP state couples to top quarks and to
/// `num_vlq` mass-degenerate vector-like quarks. The only decay channel is
/// S -> tt, and the width runs with `s`.
#[derive(Debug, Clone)]
pub struct VlqModel {
    cp: CpState,
    mass: f64,
    mass_vlq: f64,
    g_tt: f64,
    g_vlq: f64,
    num_vlq: u32,
    k_res: f64,
    k_int: f64,
    variation_scale: f64,
}

impl VlqModel {
    /// Build the model.
    ///
    /// `g_tt` is the reduced top coupling, `g_vlq` the coupling to
    /// vector-like quarks normalised to the SM top Yukawa.
    pub fn new(
        cp: CpState,
        mass: f64,
        mass_vlq: f64,
        g_tt: f64,
        g_vlq: f64,
        num_vlq: u32,
    ) -> Result<Self> {
        if ![mass, mass_vlq, g_tt, g_vlq].iter().all(|v| v.is_finite()) {
            return Err(Error::Validation("VlqModel: parameters must be finite".into()));
        }
        if mass_vlq <= 0.0 {
            return Err(Error::Validation(format!(
                "VlqModel: VLQ mass must be > 0, got {mass_vlq}"
            )));
        }
        let variation_scale = width_tt(cp, mass, g_tt);
        if !(variation_scale > 0.0) {
            return Err(Error::Validation(format!(
                "VlqModel: S -> tt width vanishes for mass={mass}, g_tt={g_tt}; \
                 the scalar must lie above the tt threshold with non-zero coupling"
            )));
        }
        Ok(Self {
            cp,
            mass,
            mass_vlq,
            g_tt,
            g_vlq,
            num_vlq,
            k_res: K_RESONANT,
            k_int: default_k_interference(),
            variation_scale,
        })
    }

    /// Override the k-factors.
    pub fn with_k_factors(mut self, k_res: f64, k_int: f64) -> Self {
        self.k_res = k_res;
        self.k_int = k_int;
        self
    }

    /// Total width at the pole, GeV.
    pub fn width(&self) -> f64 {
        self.variation_scale
    }

    fn loop_amplitude(&self, s: f64) -> Complex64 {
        self.g_tt * fermion_loop(self.cp, s, M_TOP)
            + f64::from(self.num_vlq) * self.g_vlq * fermion_loop(self.cp, s, self.mass_vlq)
    }

    fn propagator(&self, s: f64) -> Complex64 {
        let width = running_width_tt(self.cp, s, self.g_tt);
        Complex64::new(s - self.mass * self.mass, width * self.mass)
    }
}

impl CrossSectionModel for VlqModel {
    fn resonant(&self, s: f64, alpha_s: f64) -> Result<f64> {
        if below_threshold(s) {
            return Ok(0.0);
        }
        let a = 3.0 * (alpha_s * G_FERMI * M_TOP).powi(2) / (8192.0 * PI.powi(3));
        let denom = self.propagator(s).norm_sqr();
        let xsec = 2.0 * a * s * s * beta(s).powi(self.cp.beta_power()) * self.g_tt.powi(2)
            * self.loop_amplitude(s).norm_sqr()
            / denom;
        Ok(to_pb(xsec * self.k_res))
    }

    fn interference(&self, s: f64, alpha_s: f64) -> Result<f64> {
        if below_threshold(s) {
            return Ok(0.0);
        }
        let b = beta(s);
        let a = -alpha_s * alpha_s * G_FERMI * M_TOP * M_TOP / (64.0 * PI * SQRT_2);
        // Angular dependence integrated out.
        let angular = ((1.0 + b) / (1.0 - b)).ln() / b;
        let ratio = self.loop_amplitude(s) / self.propagator(s);
        let xsec = a * angular * b.powi(self.cp.beta_power()) * self.g_tt * ratio.re;
        Ok(to_pb(xsec * self.k_int))
    }

    fn variation_scale(&self) -> Result<f64> {
        Ok(self.variation_scale)
    }
}

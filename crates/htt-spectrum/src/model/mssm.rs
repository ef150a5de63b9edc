use std::f64::consts::{PI, SQRT_2};

use htt_core::traits::CrossSectionModel;
use htt_core::{Error, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::loops::{fermion_loop, scalar_loop_even};
use super::{CpState, G_FERMI, M_TOP, below_threshold, beta, to_pb};
use super::two_hdm::ScalarState;

/// k-factor of the SM tt background used to build interference k-factors.
const K_BACKGROUND_NNLO: f64 = 2.0;

/// Stop squark contributing to the ggH vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopSquark {
    /// Mass, GeV.
    pub mass: f64,
    /// Reduced H-stop-stop coupling.
    pub coupling: f64,
}

/// gg -> A/H -> tt in the MSSM with stop loops in the ggH vertex.
///
/// Stops do not couple to the CP-odd state. The interference k-factors are the
/// geometric mean of the resonant ones and the NNLO SM tt k-factor.
#[derive(Debug, Clone)]
pub struct MssmStopModel {
    a: ScalarState,
    h: ScalarState,
    stops: [StopSquark; 2],
    variation_scale: f64,
}

impl MssmStopModel {
    /// Build the model from both scalar states and the two stop squarks.
    ///
    /// `k_int` of each state is recomputed from its `k_res`.
    pub fn new(a: ScalarState, h: ScalarState, stops: [StopSquark; 2]) -> Result<Self> {
        for (label, st) in [("A", &a), ("H", &h)] {
            if !(st.mass > 0.0 && st.width > 0.0 && st.coupling.is_finite() && st.k_res > 0.0) {
                return Err(Error::Validation(format!(
                    "MssmStopModel: invalid {label} state (mass={}, width={}, k_res={})",
                    st.mass, st.width, st.k_res
                )));
            }
        }
        for stop in &stops {
            if !(stop.mass > 0.0 && stop.coupling.is_finite()) {
                return Err(Error::Validation(format!(
                    "MssmStopModel: invalid stop (mass={}, coupling={})",
                    stop.mass, stop.coupling
                )));
            }
        }
        let with_int = |st: ScalarState| {
            let k_int = (st.k_res * K_BACKGROUND_NNLO).sqrt();
            st.with_k_factors(st.k_res, k_int)
        };
        Ok(Self {
            a: with_int(a),
            h: with_int(h),
            stops,
            variation_scale: a.width.min(h.width),
        })
    }

    fn odd_amplitude(&self, s: f64) -> Complex64 {
        self.a.coupling.powi(2) * fermion_loop(CpState::Odd, s, M_TOP)
    }

    fn even_amplitude(&self, s: f64) -> Complex64 {
        let g_top = self.h.coupling;
        let mut ampl = g_top * g_top * fermion_loop(CpState::Even, s, M_TOP);
        for stop in &self.stops {
            ampl += g_top * stop.coupling * (M_TOP / stop.mass).powi(2) / 2.0
                * scalar_loop_even(s, stop.mass);
        }
        ampl
    }

    fn propagator(st: &ScalarState, s: f64) -> Complex64 {
        Complex64::new(s - st.mass * st.mass, st.width * st.mass)
    }
}

impl CrossSectionModel for MssmStopModel {
    fn resonant(&self, s: f64, alpha_s: f64) -> Result<f64> {
        if below_threshold(s) {
            return Ok(0.0);
        }
        let prefactor = 3.0 * (alpha_s * G_FERMI * M_TOP).powi(2) / (8192.0 * PI.powi(3));
        let b = beta(s);

        let odd = self.a.k_res * b * self.odd_amplitude(s).norm_sqr()
            / Self::propagator(&self.a, s).norm_sqr();
        let even = self.h.k_res * b.powi(3) * self.even_amplitude(s).norm_sqr()
            / Self::propagator(&self.h, s).norm_sqr();

        Ok(to_pb(2.0 * prefactor * s * s * (odd + even)))
    }

    fn interference(&self, s: f64, alpha_s: f64) -> Result<f64> {
        if below_threshold(s) {
            return Ok(0.0);
        }
        let prefactor = -alpha_s * alpha_s * G_FERMI * M_TOP * M_TOP / (64.0 * SQRT_2 * PI);
        let b = beta(s);
        let angular = 2.0 / b * b.atanh();

        let odd = self.a.k_int * b * self.odd_amplitude(s) / Self::propagator(&self.a, s);
        let even = self.h.k_int * b.powi(3) * self.even_amplitude(s) / Self::propagator(&self.h, s);

        Ok(to_pb(prefactor * angular * (odd + even).re))
    }

    fn variation_scale(&self) -> Result<f64> {
        Ok(self.variation_scale)
    }
}

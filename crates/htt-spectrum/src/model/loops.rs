//! One-loop gg -> S form factors and the S -> tt partial width.

use num_complex::Complex64;

use super::{CpState, G_FERMI, M_TOP, beta};

/// Scaling function `f(τ)` of the triangle loop, `τ = s / (2m)^2`.
///
/// Real below the pair threshold of the loop particle, complex above it.
pub fn triangle_f(tau: f64) -> Complex64 {
    if tau <= 1.0 {
        Complex64::new(tau.sqrt().asin().powi(2), 0.0)
    } else {
        let b = (1.0 - 1.0 / tau).sqrt();
        let l = Complex64::new(((1.0 + b) / (1.0 - b)).ln(), -std::f64::consts::PI);
        -0.25 * l * l
    }
}

/// Fermion loop amplitude for a scalar of the given CP state.
///
/// Normalised so that a heavy fermion gives `4/3` (CP-even) and `2`
/// (CP-odd); `mf` is the mass of the fermion in the loop.
pub fn fermion_loop(cp: CpState, s: f64, mf: f64) -> Complex64 {
    let tau = s / (4.0 * mf * mf);
    let f = triangle_f(tau);
    match cp {
        CpState::Even => 2.0 * (tau + (tau - 1.0) * f) / (tau * tau),
        CpState::Odd => 2.0 * f / tau,
    }
}

/// Scalar loop amplitude for a CP-even state, `m` being the scalar mass.
///
/// CP-odd states do not couple to a pair of identical scalars, so there is no
/// counterpart for them.
pub fn scalar_loop_even(s: f64, m: f64) -> Complex64 {
    let tau = s / (4.0 * m * m);
    -(tau - triangle_f(tau)) / (tau * tau)
}

/// Partial width `Γ(S -> tt)` in GeV for a scalar of mass `mass` whose top
/// coupling is `g` times the SM Yukawa.
///
/// The width is evaluated at the pole; see [`running_width_tt`] for the
/// `s`-dependent version.
pub fn width_tt(cp: CpState, mass: f64, g: f64) -> f64 {
    running_width_tt(cp, mass * mass, g)
}

/// Partial width `Γ(S -> tt)` evaluated at virtuality `s` instead of the pole.
pub fn running_width_tt(cp: CpState, s: f64, g: f64) -> f64 {
    if s <= 4.0 * M_TOP * M_TOP {
        return 0.0;
    }
    let b = beta(s);
    let prefactor = 3.0 * G_FERMI * M_TOP * M_TOP * s.sqrt() * g * g
        / (4.0 * std::f64::consts::SQRT_2 * std::f64::consts::PI);
    prefactor * b.powi(cp.beta_power())
}

//! Numerical building blocks for htt.
//!
//! This crate hosts the small pieces of numerics shared by the spectrum
//! engine:
//! - the Gaussian resolution kernel and its truncation correction
//! - Simpson and trapezoid quadrature on uniform and irregular nodes
//! - piecewise-linear interpolation with explicit out-of-range policies

pub mod interp;
pub mod normal;
pub mod quad;

pub use interp::{Extrapolation, LinearInterpolator};

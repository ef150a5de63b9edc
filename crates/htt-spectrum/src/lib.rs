//! # htt-spectrum
//!
//! Differential cross sections of gg -> S -> tt in parton-level mtt and their
//! convolution with the detector mtt resolution.
//!
//! This crate provides:
//! - Concrete [`htt_core::traits::CrossSectionModel`]s (2HDM, vector-like
//!   quarks, MSSM with stop loops) in [`model`].
//! - Collaborators: a tabulated [`PdfConvolutionTable`], strong couplings and
//!   selection efficiencies.
//! - An [`AdaptiveGridBuilder`] sampling the un-smeared spectrum densely
//!   enough for linear interpolation.
//! - A dual-path [`SmearingConvolver`] and the caching [`SpectrumEvaluator`]
//!   that ties everything together.
//! - Binned [`SignalTemplates`] and a rayon-parallel scan over parameter
//!   points.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alpha_s;
pub mod config;
pub mod efficiency;
pub mod evaluator;
pub mod grid;
pub mod luminosity;
pub mod model;
pub mod scan;
pub mod smear;
pub mod templates;

pub use alpha_s::{FixedAlphaS, RunningAlphaS};
pub use config::{EvaluatorConfig, GridConfig, PathSelection, SmearingConfig};
pub use efficiency::{LogPolynomialEfficiency, UnitEfficiency};
pub use evaluator::SpectrumEvaluator;
pub use grid::{AdaptiveGrid, AdaptiveGridBuilder};
pub use luminosity::PdfConvolutionTable;
pub use model::{CpState, MssmStopModel, ScalarState, StopSquark, TwoHdmModel, VlqModel};
pub use scan::{scan_parallel, scan_templates};
pub use smear::{ConvolutionPath, SmearingConvolver};
pub use templates::{integrate_bins, ScaleVariation, SignalTemplates, SignedTemplate};

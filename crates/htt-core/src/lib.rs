//! # htt-core
//!
//! Shared vocabulary for the htt workspace: the error type, the [`Result`]
//! alias, and the collaborator traits through which the spectrum engine talks
//! to physics models, parton luminosities, the strong coupling and selection
//! efficiencies.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::Subprocess;

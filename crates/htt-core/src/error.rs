//! Error types for htt

use thiserror::Error;

/// htt error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required model property was never set
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Non-finite cross-section sample encountered while building a grid
    #[error("Invalid function value {value} at x = {x}")]
    InvalidFunctionValue {
        /// Abscissa at which the function was evaluated.
        x: f64,
        /// Offending value.
        value: f64,
    },

    /// Empty or inverted domain
    #[error("Degenerate range [{min}, {max}]")]
    DegenerateRange {
        /// Lower edge.
        min: f64,
        /// Upper edge.
        max: f64,
    },

    /// Efficiency requested for an unknown subprocess label
    #[error("Do not recognize subprocess \"{0}\"")]
    UnrecognizedSubprocess(String),

    /// Lookup outside the stored range of a table
    #[error("Value {value} outside table range [{min}, {max}]")]
    OutOfRange {
        /// Requested abscissa.
        value: f64,
        /// First stored abscissa.
        min: f64,
        /// Last stored abscissa.
        max: f64,
    },

    /// Adaptive refinement exceeded its subdivision budget
    #[error("Refinement limit of {0} subdivisions reached")]
    RefinementLimit(usize),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_label() {
        let err = Error::UnrecognizedSubprocess("Bkg".into());
        assert_eq!(err.to_string(), "Do not recognize subprocess \"Bkg\"");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<Vec<f64>, _> = serde_json::from_str("[1.0,");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}

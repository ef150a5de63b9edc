//! Common data types for htt

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Component of the gg -> S -> tt cross section.
///
/// Selection efficiencies are fitted separately for the two pieces, so the
/// label travels alongside every efficiency lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subprocess {
    /// Resonant production, `|A_S|^2`.
    #[serde(rename = "Res")]
    Resonant,
    /// Interference with the SM gg -> tt amplitude.
    #[serde(rename = "Int")]
    Interference,
}

impl Subprocess {
    /// Short label used in configuration files.
    pub fn label(self) -> &'static str {
        match self {
            Subprocess::Resonant => "Res",
            Subprocess::Interference => "Int",
        }
    }
}

impl fmt::Display for Subprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subprocess {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Res" => Ok(Subprocess::Resonant),
            "Int" => Ok(Subprocess::Interference),
            other => Err(Error::UnrecognizedSubprocess(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subprocess_labels_round_trip() {
        for sp in [Subprocess::Resonant, Subprocess::Interference] {
            assert_eq!(sp.label().parse::<Subprocess>().unwrap(), sp);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = "res".parse::<Subprocess>().unwrap_err();
        assert!(matches!(err, Error::UnrecognizedSubprocess(ref s) if s == "res"));
    }

    #[test]
    fn test_serde_uses_short_labels() {
        let json = serde_json::to_string(&Subprocess::Interference).unwrap();
        assert_eq!(json, "\"Int\"");
    }
}

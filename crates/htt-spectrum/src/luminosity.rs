//! Tabulated gluon-gluon luminosity.
//!
//! The table maps parton-level `s` (GeV^2) to the PDF convolution
//! `1/S ∫ f(x1) f(s/(S x1)) dx1/x1`, precomputed externally for a fixed
//! collider energy `S`. It is stored as two rows (`s` values, convolution
//! values) sorted by `s` and interpolated linearly.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use htt_core::traits::PartonLuminosity;
use htt_core::{Error, Result};
use htt_prob::{Extrapolation, LinearInterpolator};
use serde::{Deserialize, Serialize};

/// On-disk layout: `[[s0, s1, ...], [v0, v1, ...]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct TwoRows([Vec<f64>; 2]);

/// Linearly interpolated PDF convolution table.
///
/// Queries outside the stored range fail with [`Error::OutOfRange`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TwoRows", into = "TwoRows")]
pub struct PdfConvolutionTable {
    interp: LinearInterpolator,
}

impl PdfConvolutionTable {
    /// Build from matching `s` and convolution columns.
    pub fn new(s: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let interp = LinearInterpolator::new(s, values, Extrapolation::Error)?;
        Ok(Self { interp })
    }

    /// Parse a two-row JSON array.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a two-row JSON array from a file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Stored range of `s`.
    pub fn range(&self) -> (f64, f64) {
        self.interp.range()
    }

    /// Tabulated `s` values.
    pub fn s(&self) -> &[f64] {
        self.interp.xs()
    }

    /// Tabulated convolution values.
    pub fn values(&self) -> &[f64] {
        self.interp.ys()
    }

    /// Number of tabulated points.
    pub fn len(&self) -> usize {
        self.s().len()
    }

    /// Always false for a validated table.
    pub fn is_empty(&self) -> bool {
        self.s().is_empty()
    }
}

impl TryFrom<TwoRows> for PdfConvolutionTable {
    type Error = Error;

    fn try_from(rows: TwoRows) -> Result<Self> {
        let [s, values] = rows.0;
        Self::new(s, values)
    }
}

impl From<PdfConvolutionTable> for TwoRows {
    fn from(table: PdfConvolutionTable) -> Self {
        TwoRows([table.s().to_vec(), table.values().to_vec()])
    }
}

impl PartonLuminosity for PdfConvolutionTable {
    fn luminosity(&self, s: f64) -> Result<f64> {
        self.interp.eval(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolates_and_rejects_outside() {
        let table = PdfConvolutionTable::new(vec![1.0e4, 2.0e4, 4.0e4], vec![3.0, 2.0, 1.0]).unwrap();
        assert_relative_eq!(table.luminosity(1.5e4).unwrap(), 2.5);
        assert_relative_eq!(table.luminosity(3.0e4).unwrap(), 1.5);
        assert!(matches!(table.luminosity(5.0e4), Err(Error::OutOfRange { .. })));
        assert_eq!(table.range(), (1.0e4, 4.0e4));
    }

    #[test]
    fn test_json_two_rows() {
        let json = "[[100.0, 200.0, 300.0], [1.0, 0.5, 0.25]]";
        let table = PdfConvolutionTable::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.s(), &[100.0, 200.0, 300.0]);
        assert_eq!(table.values(), &[1.0, 0.5, 0.25]);
        assert_relative_eq!(table.luminosity(250.0).unwrap(), 0.375);

        let back = serde_json::to_string(&table).unwrap();
        assert_eq!(back, "[[100.0,200.0,300.0],[1.0,0.5,0.25]]");
    }

    #[test]
    fn test_json_rejects_unsorted() {
        let json = "[[100.0, 50.0], [1.0, 0.5]]";
        let err = PdfConvolutionTable::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}

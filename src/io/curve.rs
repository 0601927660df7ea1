//! Read/write curve JSON files.
//!
//! The file carries the snapshot itself plus the classification computed for
//! the requested short/long pair, so it can be re-plotted or diffed later.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{CurveClassification, CurveSnapshot, Regime};
use crate::error::AppError;

/// Serialized form of an analysed curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub short_maturity: f64,
    pub long_maturity: f64,
    pub slope: f64,
    pub regime: Regime,
    pub inverted: bool,
    pub curve: CurveSnapshot,
}

impl CurveFile {
    pub fn new(curve: &CurveSnapshot, classification: &CurveClassification, short: f64, long: f64) -> Self {
        Self {
            tool: "mr".to_string(),
            short_maturity: short,
            long_maturity: long,
            slope: classification.slope,
            regime: classification.regime,
            inverted: classification.inverted,
            curve: curve.clone(),
        }
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file. The embedded snapshot is re-validated.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let mut curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    curve.curve = CurveSnapshot::new(curve.curve.as_of, curve.curve.points().to_vec())?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::classify;

    #[test]
    fn curve_json_round_trip_preserves_regime() {
        let snap = CurveSnapshot::from_pairs(None, &[2.0, 10.0], &[5.3, 4.4]).unwrap();
        let cls = classify(&snap, 2.0, 10.0).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");

        write_curve_json(&path, &CurveFile::new(&snap, &cls, 2.0, 10.0)).unwrap();
        let back = read_curve_json(&path).unwrap();

        assert_eq!(back.regime, Regime::Inverted);
        assert!(back.inverted);
        assert_eq!(back.curve, snap);
    }
}

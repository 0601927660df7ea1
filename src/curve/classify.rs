//! Slope and regime classification.
//!
//! `slope = y(long) - y(short)` in percentage points. Regimes are read from an
//! ordered table of `(lower_bound, regime)` bands: the first band whose lower
//! bound is `<= slope` wins.
//!
//! | slope                 | regime   |
//! |-----------------------|----------|
//! | `slope >= 0`          | Normal   |
//! | `-0.25 <= slope < 0`  | Flat     |
//! | `slope < -0.25`       | Inverted |

use crate::domain::{CurveClassification, CurvePoint, CurveSnapshot, Regime};
use crate::error::AnalyticsError;

/// Lower bound of the `Normal` band (pp).
pub const T_NORMAL: f64 = 0.0;

/// Lower bound of the `Flat` band (pp).
pub const T_INVERTED: f64 = -0.25;

/// Bands in evaluation order (highest lower bound first).
pub const REGIME_BANDS: [(f64, Regime); 3] = [
    (T_NORMAL, Regime::Normal),
    (T_INVERTED, Regime::Flat),
    (f64::NEG_INFINITY, Regime::Inverted),
];

/// Map a slope to its regime.
pub fn regime_for_slope(slope: f64) -> Regime {
    REGIME_BANDS
        .iter()
        .find(|(lower, _)| slope >= *lower)
        .map(|(_, regime)| *regime)
        .unwrap_or(Regime::Inverted)
}

/// Classify a snapshot using the yields at two exact maturities.
pub fn classify(
    snapshot: &CurveSnapshot,
    short_maturity: f64,
    long_maturity: f64,
) -> Result<CurveClassification, AnalyticsError> {
    let short = snapshot.yield_at(short_maturity)?;
    let long = snapshot.yield_at(long_maturity)?;
    let slope = long - short;

    Ok(CurveClassification {
        slope,
        regime: regime_for_slope(slope),
        inverted: slope < 0.0,
    })
}

/// Per-maturity change between two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct TenorChange {
    pub maturity_years: f64,
    pub latest_pct: f64,
    pub prior_pct: f64,
    pub change_bps: f64,
}

/// Latest vs prior curve, with both classifications.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveComparison {
    pub latest: CurveClassification,
    pub prior: CurveClassification,
    /// Only maturities present in both snapshots.
    pub changes: Vec<TenorChange>,
    pub slope_change_bps: f64,
}

/// Compare two snapshots on the maturities they share.
pub fn compare(
    latest: &CurveSnapshot,
    prior: &CurveSnapshot,
    short_maturity: f64,
    long_maturity: f64,
    scale: f64,
) -> Result<CurveComparison, AnalyticsError> {
    let latest_cls = classify(latest, short_maturity, long_maturity)?;
    let prior_cls = classify(prior, short_maturity, long_maturity)?;

    let changes = latest
        .points()
        .iter()
        .filter_map(|&CurvePoint { maturity_years, yield_pct }| {
            prior.yield_at(maturity_years).ok().map(|prior_pct| TenorChange {
                maturity_years,
                latest_pct: yield_pct,
                prior_pct,
                change_bps: (yield_pct - prior_pct) * scale,
            })
        })
        .collect();

    Ok(CurveComparison {
        latest: latest_cls,
        prior: prior_cls,
        changes,
        slope_change_bps: (latest_cls.slope - prior_cls.slope) * scale,
    })
}

//! Built-in synthetic curve shapes.
//!
//! Handy for sanity-checking the classifier and the plot without a FRED key.

use crate::domain::CurveSnapshot;
use crate::error::AnalyticsError;

/// Maturities shared by every scenario (years).
pub const SCENARIO_MATURITIES: [f64; 8] = [0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Normal,
    Flat,
    Inverted,
    Steep,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Normal,
        Scenario::Flat,
        Scenario::Inverted,
        Scenario::Steep,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::Flat => "flat",
            Scenario::Inverted => "inverted",
            Scenario::Steep => "steep",
        }
    }

    /// Yields (%) aligned with [`SCENARIO_MATURITIES`].
    pub fn yields(self) -> [f64; 8] {
        match self {
            Scenario::Normal => [5.30, 5.20, 5.05, 4.80, 4.40, 4.20, 4.35, 4.40],
            Scenario::Flat => [4.80, 4.78, 4.75, 4.72, 4.70, 4.68, 4.67, 4.66],
            Scenario::Inverted => [5.40, 5.30, 5.10, 4.70, 4.30, 4.10, 4.15, 4.20],
            Scenario::Steep => [3.80, 3.90, 4.10, 4.50, 5.00, 5.40, 5.60, 5.70],
        }
    }

    pub fn snapshot(self) -> Result<CurveSnapshot, AnalyticsError> {
        CurveSnapshot::from_pairs(None, &SCENARIO_MATURITIES, &self.yields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::classify;
    use crate::domain::Regime;

    #[test]
    fn scenario_regimes_on_2s10s() {
        let regime = |s: Scenario| classify(&s.snapshot().unwrap(), 2.0, 10.0).unwrap().regime;

        // The "normal" and "inverted" scenarios both have 10y below 2y.
        assert_eq!(regime(Scenario::Normal), Regime::Inverted);
        assert_eq!(regime(Scenario::Inverted), Regime::Inverted);
        assert_eq!(regime(Scenario::Flat), Regime::Flat);
        assert_eq!(regime(Scenario::Steep), Regime::Normal);
    }

    #[test]
    fn every_scenario_builds() {
        for s in Scenario::ALL {
            let snap = s.snapshot().unwrap();
            assert_eq!(snap.points().len(), SCENARIO_MATURITIES.len());
        }
    }
}

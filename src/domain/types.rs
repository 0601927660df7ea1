//! Shared domain types.
//!
//! Every value here is immutable once constructed. Constructors validate
//! eagerly (ordering, uniqueness, finiteness) so that the analytics code can
//! rely on those invariants without re-checking them.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{NaiveDate, TimeDelta};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Percentage points to basis points.
pub const BPS_PER_PERCENT: f64 = 100.0;

/// Maturities closer than this are treated as the same tenor.
pub const MATURITY_EPS: f64 = 1e-9;

/// Upper bound for lookback and comparison offsets (about a century).
pub const MAX_DAY_OFFSET: i64 = 36_500;

/// `date` minus `days` calendar days, rejecting offsets outside `0..=MAX_DAY_OFFSET`.
pub fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate, AnalyticsError> {
    let invalid = || AnalyticsError::InvalidDayOffset {
        days,
        max: MAX_DAY_OFFSET,
    };
    if !(0..=MAX_DAY_OFFSET).contains(&days) {
        return Err(invalid());
    }
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_sub_signed(delta))
        .ok_or_else(invalid)
}

/// One daily observation of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A gap-tolerant daily series with strictly increasing, unique dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: String,
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series from observations that are already in date order.
    ///
    /// Fails on non-increasing dates (including duplicates) or non-finite values.
    pub fn new(id: impl Into<String>, observations: Vec<Observation>) -> Result<Self, AnalyticsError> {
        let id = id.into();
        for obs in &observations {
            if !obs.value.is_finite() {
                return Err(AnalyticsError::NonFiniteValue {
                    what: format!("value in series {id} on {}", obs.date),
                });
            }
        }
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalyticsError::NonMonotonicSeries {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(Self { id, observations })
    }

    /// Sort by date first, then validate. Duplicate dates are still rejected.
    pub fn from_unsorted(id: impl Into<String>, mut observations: Vec<Observation>) -> Result<Self, AnalyticsError> {
        observations.sort_by_key(|o| o.date);
        Self::new(id, observations)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Most recent observation with `obs.date <= date`.
    pub fn last_at_or_before(&self, date: NaiveDate) -> Option<&Observation> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        idx.checked_sub(1).map(|i| &self.observations[i])
    }

    /// First observation with `obs.date > date`.
    pub fn first_after(&self, date: NaiveDate) -> Option<&Observation> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        self.observations.get(idx)
    }
}

/// A scheduled macro announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_id: String,
    /// Category label, e.g. `CPI`, `FOMC`, `NFP`.
    pub event_type: String,
    pub event_date: NaiveDate,
}

impl Event {
    pub fn new(event_id: impl Into<String>, event_type: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            event_date,
        }
    }
}

/// Events keyed by a unique `event_id`. No ordering is implied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventSet {
    events: Vec<Event>,
}

impl EventSet {
    pub fn new(events: Vec<Event>) -> Result<Self, AnalyticsError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.event_id.as_str()) {
                return Err(AnalyticsError::DuplicateEventId {
                    event_id: event.event_id.clone(),
                });
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Output of alignment for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRecord {
    pub event_id: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    /// Scaled post-minus-pre move; absent when the record was reloaded with an empty cell.
    pub reaction: Option<f64>,
}

/// Descriptive statistics for one event category.
///
/// `mean` is `None` when `count == 0`; `stddev` is `None` when `count < 2`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionSummary {
    pub category: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

/// One point on a yield curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub maturity_years: f64,
    pub yield_pct: f64,
}

impl CurvePoint {
    pub fn new(maturity_years: f64, yield_pct: f64) -> Self {
        Self {
            maturity_years,
            yield_pct,
        }
    }
}

/// A yield curve snapshot, sorted by maturity and unique by maturity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    /// Date the curve was observed (`None` for synthetic scenarios).
    pub as_of: Option<NaiveDate>,
    points: Vec<CurvePoint>,
}

impl CurveSnapshot {
    pub fn new(as_of: Option<NaiveDate>, mut points: Vec<CurvePoint>) -> Result<Self, AnalyticsError> {
        for p in &points {
            if !(p.maturity_years.is_finite() && p.maturity_years > 0.0) {
                return Err(AnalyticsError::InvalidMaturity {
                    maturity: p.maturity_years,
                });
            }
            if !p.yield_pct.is_finite() {
                return Err(AnalyticsError::NonFiniteValue {
                    what: format!("yield at {}y", p.maturity_years),
                });
            }
        }
        points.sort_by(|a, b| a.maturity_years.total_cmp(&b.maturity_years));
        for pair in points.windows(2) {
            if (pair[1].maturity_years - pair[0].maturity_years).abs() < MATURITY_EPS {
                return Err(AnalyticsError::DuplicateMaturity {
                    maturity: pair[1].maturity_years,
                });
            }
        }
        Ok(Self { as_of, points })
    }

    /// Build from parallel maturity/yield slices.
    pub fn from_pairs(as_of: Option<NaiveDate>, maturities: &[f64], yields: &[f64]) -> Result<Self, AnalyticsError> {
        let points = maturities
            .iter()
            .zip(yields.iter())
            .map(|(&m, &y)| CurvePoint::new(m, y))
            .collect();
        Self::new(as_of, points)
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Exact lookup (no interpolation).
    pub fn yield_at(&self, maturity_years: f64) -> Result<f64, AnalyticsError> {
        self.points
            .iter()
            .find(|p| (p.maturity_years - maturity_years).abs() < MATURITY_EPS)
            .map(|p| p.yield_pct)
            .ok_or(AnalyticsError::MissingMaturity {
                maturity: maturity_years,
            })
    }
}

/// Yield curve shape label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    Normal,
    Flat,
    Inverted,
}

impl Regime {
    pub fn display_name(self) -> &'static str {
        match self {
            Regime::Normal => "Normal",
            Regime::Flat => "Flat",
            Regime::Inverted => "Inverted",
        }
    }
}

/// Long-minus-short slope and its regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveClassification {
    /// Percentage points.
    pub slope: f64,
    pub regime: Regime,
    /// `slope < 0`, regardless of band.
    pub inverted: bool,
}

/// US Treasury constant-maturity tenors available from FRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Tenor {
    #[serde(rename = "3m")]
    #[value(name = "3m")]
    M3,
    #[serde(rename = "2y")]
    #[value(name = "2y")]
    Y2,
    #[serde(rename = "5y")]
    #[value(name = "5y")]
    Y5,
    #[serde(rename = "10y")]
    #[value(name = "10y")]
    Y10,
    #[serde(rename = "30y")]
    #[value(name = "30y")]
    Y30,
}

impl Tenor {
    pub const ALL: [Tenor; 5] = [Tenor::M3, Tenor::Y2, Tenor::Y5, Tenor::Y10, Tenor::Y30];

    pub fn display_name(self) -> &'static str {
        match self {
            Tenor::M3 => "3M",
            Tenor::Y2 => "2Y",
            Tenor::Y5 => "5Y",
            Tenor::Y10 => "10Y",
            Tenor::Y30 => "30Y",
        }
    }

    pub fn series_id(self) -> &'static str {
        match self {
            Tenor::M3 => "DTB3",
            Tenor::Y2 => "DGS2",
            Tenor::Y5 => "DGS5",
            Tenor::Y10 => "DGS10",
            Tenor::Y30 => "DGS30",
        }
    }

    pub fn maturity_years(self) -> f64 {
        match self {
            Tenor::M3 => 0.25,
            Tenor::Y2 => 2.0,
            Tenor::Y5 => 5.0,
            Tenor::Y10 => 10.0,
            Tenor::Y30 => 30.0,
        }
    }
}

/// Configuration for an event-reaction study run.
#[derive(Debug, Clone)]
pub struct StudyConfig {
    pub series_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub events_path: PathBuf,
    /// Multiplier applied to raw deltas (100 turns a percent series into bp).
    pub scale: f64,
    pub export_path: Option<PathBuf>,
    /// Name of the reaction column in exported CSVs.
    pub value_column: String,
    /// Category to summarize; `None` summarizes every category present.
    pub category: Option<String>,
    pub preview_rows: usize,
    pub parallel: bool,
}

/// Configuration for a curve analytics run.
#[derive(Debug, Clone)]
pub struct CurveConfig {
    pub as_of: NaiveDate,
    pub lookback_days: i64,
    pub tenors: Vec<Tenor>,
    pub short_maturity: f64,
    pub long_maturity: f64,
    /// Days back for the comparison curve; `None` disables the comparison.
    pub compare_days: Option<i64>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_curve: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn days_before_rejects_out_of_range_offsets() {
        assert_eq!(days_before(d(6, 3), 10).unwrap(), d(5, 24));
        assert_eq!(days_before(d(6, 3), 0).unwrap(), d(6, 3));

        for days in [-1, MAX_DAY_OFFSET + 1, i64::MAX, i64::MIN] {
            let err = days_before(d(6, 3), days).unwrap_err();
            assert_eq!(err.exit_code(), 2);
            assert!(matches!(err, AnalyticsError::InvalidDayOffset { .. }));
        }
    }

    #[test]
    fn series_rejects_non_increasing_dates() {
        let err = Series::new(
            "DGS2",
            vec![Observation::new(d(1, 2), 4.0), Observation::new(d(1, 2), 4.1)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::NonMonotonicSeries {
                previous: d(1, 2),
                current: d(1, 2)
            }
        );

        let err = Series::new(
            "DGS2",
            vec![Observation::new(d(1, 3), 4.0), Observation::new(d(1, 2), 4.1)],
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::NonMonotonicSeries { .. }));
    }

    #[test]
    fn series_from_unsorted_sorts_then_validates() {
        let s = Series::from_unsorted(
            "DGS2",
            vec![Observation::new(d(1, 5), 4.1), Observation::new(d(1, 1), 4.0)],
        )
        .unwrap();
        assert_eq!(s.first().unwrap().date, d(1, 1));
        assert_eq!(s.last().unwrap().date, d(1, 5));
    }

    #[test]
    fn series_rejects_nan() {
        let err = Series::new("DGS2", vec![Observation::new(d(1, 1), f64::NAN)]).unwrap_err();
        assert!(matches!(err, AnalyticsError::NonFiniteValue { .. }));
    }

    #[test]
    fn neighbor_lookup_uses_le_and_gt() {
        let s = Series::new(
            "DGS2",
            vec![
                Observation::new(d(1, 2), 4.0),
                Observation::new(d(1, 3), 4.1),
                Observation::new(d(1, 8), 4.2),
            ],
        )
        .unwrap();

        // Exact match is "pre", never "post".
        assert_eq!(s.last_at_or_before(d(1, 3)).unwrap().date, d(1, 3));
        assert_eq!(s.first_after(d(1, 3)).unwrap().date, d(1, 8));

        // Gap.
        assert_eq!(s.last_at_or_before(d(1, 5)).unwrap().date, d(1, 3));
        assert_eq!(s.first_after(d(1, 5)).unwrap().date, d(1, 8));

        // Boundaries.
        assert!(s.last_at_or_before(d(1, 1)).is_none());
        assert!(s.first_after(d(1, 8)).is_none());
    }

    #[test]
    fn event_set_rejects_duplicate_ids() {
        let err = EventSet::new(vec![
            Event::new("1", "CPI", d(1, 10)),
            Event::new("1", "NFP", d(2, 2)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::DuplicateEventId {
                event_id: "1".to_string()
            }
        );
    }

    #[test]
    fn curve_snapshot_sorts_and_validates() {
        let snap = CurveSnapshot::from_pairs(None, &[10.0, 2.0], &[4.4, 5.3]).unwrap();
        assert_eq!(snap.points()[0].maturity_years, 2.0);
        assert_eq!(snap.yield_at(10.0).unwrap(), 4.4);

        let err = CurveSnapshot::from_pairs(None, &[2.0, 2.0], &[4.4, 5.3]).unwrap_err();
        assert!(matches!(err, AnalyticsError::DuplicateMaturity { .. }));

        let err = CurveSnapshot::from_pairs(None, &[0.0], &[4.4]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidMaturity { .. }));
    }

    #[test]
    fn curve_lookup_does_not_interpolate() {
        let snap = CurveSnapshot::from_pairs(None, &[2.0, 10.0], &[5.3, 4.4]).unwrap();
        assert_eq!(
            snap.yield_at(5.0).unwrap_err(),
            AnalyticsError::MissingMaturity { maturity: 5.0 }
        );
    }

    #[test]
    fn tenor_table_is_ordered_by_maturity() {
        for pair in Tenor::ALL.windows(2) {
            assert!(pair[0].maturity_years() < pair[1].maturity_years());
        }
        assert_eq!(Tenor::Y10.series_id(), "DGS10");
    }
}

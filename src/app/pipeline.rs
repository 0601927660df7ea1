//! Shared study/curve workflows.
//!
//! Each workflow has a fetching entry point and a `*_with_*` variant that takes
//! already-retrieved inputs, so the analytics path can run without network.

use tracing::{info, warn};

use crate::curve::{CurveComparison, classify, compare};
use crate::data::FredClient;
use crate::domain::{
    BPS_PER_PERCENT, CurveClassification, CurveConfig, CurveSnapshot, EventSet, ReactionRecord, ReactionSummary,
    Series, StudyConfig, days_before,
};
use crate::error::AppError;
use crate::events::{AlignmentReport, ReactionAligner, summarize, summarize_all};

/// All computed outputs of a single `mr events` run.
#[derive(Debug, Clone)]
pub struct StudyOutput {
    pub series: Series,
    pub n_events: usize,
    pub records: Vec<ReactionRecord>,
    pub report: AlignmentReport,
    pub summaries: Vec<ReactionSummary>,
}

/// Load events, fetch the series from FRED, then align and summarize.
pub fn run_study(config: &StudyConfig, client: &FredClient) -> Result<StudyOutput, AppError> {
    let events = crate::io::load_events(&config.events_path)?;
    let series = client.fetch_series(&config.series_id, config.start_date, config.end_date)?;
    run_study_with_data(config, series, &events)
}

/// Align and summarize pre-loaded inputs.
pub fn run_study_with_data(config: &StudyConfig, series: Series, events: &EventSet) -> Result<StudyOutput, AppError> {
    if series.is_empty() {
        warn!(series_id = series.id(), "series has no observations; every event will be skipped");
    }

    let aligner = ReactionAligner::new(config.scale)?;
    let (records, report) = if config.parallel {
        aligner.align_par_with_report(&series, events)
    } else {
        aligner.align_with_report(&series, events)
    };

    info!(
        emitted = report.emitted,
        skipped_no_pre = report.skipped_no_pre,
        skipped_no_post = report.skipped_no_post,
        "aligned events"
    );

    let summaries = summaries_for(&records, config.category.as_deref());

    Ok(StudyOutput {
        series,
        n_events: events.len(),
        records,
        report,
        summaries,
    })
}

/// One summary for `category`, or one per category present when `None`.
pub fn summaries_for(records: &[ReactionRecord], category: Option<&str>) -> Vec<ReactionSummary> {
    match category {
        Some(c) => vec![summarize(records, c)],
        None => summarize_all(records),
    }
}

/// All computed outputs of a single `mr curve` run.
#[derive(Debug, Clone)]
pub struct CurveOutput {
    pub latest: CurveSnapshot,
    pub classification: CurveClassification,
    pub prior: Option<CurveSnapshot>,
    pub comparison: Option<CurveComparison>,
}

/// Fetch the latest (and optionally a prior) curve, then classify/compare.
pub fn run_curve(config: &CurveConfig, client: &FredClient) -> Result<CurveOutput, AppError> {
    let prior_date = config
        .compare_days
        .map(|days| days_before(config.as_of, days))
        .transpose()?;
    let latest = client.fetch_curve(config.as_of, &config.tenors, config.lookback_days)?;
    let prior = match prior_date {
        Some(date) => Some(client.fetch_curve(date, &config.tenors, config.lookback_days)?),
        None => None,
    };
    run_curve_with_snapshots(config, latest, prior)
}

/// Classify pre-fetched snapshots.
pub fn run_curve_with_snapshots(
    config: &CurveConfig,
    latest: CurveSnapshot,
    prior: Option<CurveSnapshot>,
) -> Result<CurveOutput, AppError> {
    let classification = classify(&latest, config.short_maturity, config.long_maturity)?;
    info!(
        slope = classification.slope,
        regime = classification.regime.display_name(),
        "classified curve"
    );

    let comparison = match &prior {
        Some(prior) => Some(compare(
            &latest,
            prior,
            config.short_maturity,
            config.long_maturity,
            BPS_PER_PERCENT,
        )?),
        None => None,
    };

    Ok(CurveOutput {
        latest,
        classification,
        prior,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Event, Observation, Regime, Tenor};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn study_config() -> StudyConfig {
        StudyConfig {
            series_id: "DGS2".to_string(),
            start_date: d(1, 1),
            end_date: None,
            events_path: PathBuf::from("unused.csv"),
            scale: BPS_PER_PERCENT,
            export_path: None,
            value_column: "reaction_bps".to_string(),
            category: Some("CPI".to_string()),
            preview_rows: 10,
            parallel: false,
        }
    }

    fn curve_config() -> CurveConfig {
        CurveConfig {
            as_of: d(6, 3),
            lookback_days: 10,
            tenors: Tenor::ALL.to_vec(),
            short_maturity: 2.0,
            long_maturity: 10.0,
            compare_days: Some(365),
            plot: false,
            plot_width: 60,
            plot_height: 15,
            export_curve: None,
        }
    }

    #[test]
    fn study_end_to_end_offline() {
        let series = Series::new(
            "DGS2",
            vec![Observation::new(d(1, 1), 4.00), Observation::new(d(1, 5), 4.10)],
        )
        .unwrap();
        let events = EventSet::new(vec![
            Event::new("1", "CPI", d(1, 3)),
            Event::new("2", "FOMC", d(1, 9)),
        ])
        .unwrap();

        let out = run_study_with_data(&study_config(), series, &events).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.report.skipped_no_post, 1);
        assert_eq!(out.summaries.len(), 1);
        assert_eq!(out.summaries[0].count, 1);
        assert!((out.summaries[0].mean.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_study_matches_sequential() {
        let obs: Vec<Observation> = (1..=28).map(|day| Observation::new(d(2, day), day as f64 / 10.0)).collect();
        let series = Series::new("DGS2", obs).unwrap();
        let events = EventSet::new(
            (1..=29)
                .map(|day| Event::new(day.to_string(), if day % 2 == 0 { "CPI" } else { "NFP" }, d(2, day)))
                .collect(),
        )
        .unwrap();

        let mut config = study_config();
        config.category = None;
        let seq = run_study_with_data(&config, series.clone(), &events).unwrap();
        config.parallel = true;
        let par = run_study_with_data(&config, series, &events).unwrap();

        assert_eq!(seq.records, par.records);
        assert_eq!(seq.report, par.report);
        assert_eq!(seq.summaries, par.summaries);
    }

    #[test]
    fn invalid_scale_is_a_config_error() {
        let mut config = study_config();
        config.scale = 0.0;
        let series = Series::new("DGS2", Vec::new()).unwrap();
        let err = run_study_with_data(&config, series, &EventSet::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn curve_comparison_offline() {
        let latest = CurveSnapshot::from_pairs(Some(d(6, 3)), &[2.0, 10.0], &[4.0, 4.5]).unwrap();
        let prior = CurveSnapshot::from_pairs(Some(d(6, 3)), &[2.0, 10.0], &[5.3, 4.4]).unwrap();

        let out = run_curve_with_snapshots(&curve_config(), latest, Some(prior)).unwrap();
        assert_eq!(out.classification.regime, Regime::Normal);
        let cmp = out.comparison.unwrap();
        assert_eq!(cmp.prior.regime, Regime::Inverted);
        assert!((cmp.slope_change_bps - 140.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_compare_days_is_a_config_error() {
        let client = crate::data::FredClient::new(crate::data::FredConfig::new("test-key")).unwrap();
        let mut config = curve_config();
        config.compare_days = Some(i64::MAX);
        let err = run_curve(&config, &client).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_long_tenor_fails_with_exit_code_3() {
        let mut config = curve_config();
        config.long_maturity = 30.0;
        let latest = CurveSnapshot::from_pairs(None, &[2.0, 10.0], &[4.0, 4.5]).unwrap();
        let err = run_curve_with_snapshots(&config, latest, None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

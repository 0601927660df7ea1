//! Formatted terminal output.
//!
//! Formatting lives here so the analytics modules stay free of presentation
//! concerns and output changes stay localized.

use crate::curve::CurveComparison;
use crate::domain::{CurveClassification, CurveSnapshot, ReactionRecord, ReactionSummary, Series, StudyConfig};
use crate::events::AlignmentReport;

/// Header for an event study run.
pub fn format_study_header(series: &Series, n_events: usize, report: &AlignmentReport, config: &StudyConfig) -> String {
    let mut out = String::new();
    out.push_str("=== mr - Macro Event Reaction Study ===\n");
    out.push_str(&format!("Series: {}\n", series.id()));
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Observations: n={} | [{}, {}]\n",
            series.len(),
            first.date,
            last.date
        )),
        _ => out.push_str("Observations: n=0\n"),
    }
    out.push_str(&format!("Scale: x{}\n", config.scale));
    out.push_str(&format!(
        "Events: n={} | aligned={} | skipped={} (no pre: {}, no post: {})\n",
        n_events,
        report.emitted,
        report.skipped(),
        report.skipped_no_pre,
        report.skipped_no_post
    ));
    out
}

/// First `max_rows` reaction records as a table.
pub fn format_reactions(records: &[ReactionRecord], max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<8} {:<10} {:>10}\n",
        "event_id", "type", "date", "reaction"
    ));
    out.push_str(&format!("{:-<12} {:-<8} {:-<10} {:->10}\n", "", "", "", ""));

    for r in records.iter().take(max_rows) {
        out.push_str(&format!(
            "{:<12} {:<8} {:<10} {:>10}\n",
            truncate(&r.event_id, 12),
            truncate(&r.event_type, 8),
            r.event_date,
            fmt_opt(r.reaction),
        ));
    }
    if records.len() > max_rows {
        out.push_str(&format!("... ({} more)\n", records.len() - max_rows));
    }
    out
}

/// Summary block for one category.
pub fn format_summary(summary: &ReactionSummary, unit: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(">>> {} reaction summary (n={}) <<<\n", summary.category, summary.count));
    out.push_str(&format!("Average reaction ({unit}): {}\n", fmt_opt(summary.mean)));
    out.push_str(&format!("Std dev ({unit}): {}\n", fmt_opt(summary.stddev)));
    out
}

/// Slope/regime block for one curve.
pub fn format_curve_analytics(
    label: &str,
    curve: &CurveSnapshot,
    classification: &CurveClassification,
    short_maturity: f64,
    long_maturity: f64,
) -> String {
    let mut out = String::new();
    match curve.as_of {
        Some(date) => out.push_str(&format!("Yield curve analytics ({label}, {date})\n")),
        None => out.push_str(&format!("Yield curve analytics ({label})\n")),
    }
    for p in curve.points() {
        out.push_str(&format!("  {:>4} {:>6.2}%\n", fmt_maturity(p.maturity_years), p.yield_pct));
    }
    out.push_str(&format!(
        "{}-{} spread: {:.2}%\n",
        fmt_maturity(long_maturity),
        fmt_maturity(short_maturity),
        classification.slope
    ));
    out.push_str(&format!("Inverted: {}\n", classification.inverted));
    out.push_str(&format!("Regime: {}\n", classification.regime.display_name()));
    out
}

/// Latest vs prior curve table.
pub fn format_comparison(cmp: &CurveComparison) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>5} {:>8} {:>8} {:>9}\n", "tenor", "latest", "prior", "chg(bp)"));
    out.push_str(&format!("{:->5} {:->8} {:->8} {:->9}\n", "", "", "", ""));
    for c in &cmp.changes {
        out.push_str(&format!(
            "{:>5} {:>8.2} {:>8.2} {:>9.1}\n",
            fmt_maturity(c.maturity_years),
            c.latest_pct,
            c.prior_pct,
            c.change_bps
        ));
    }
    out.push_str(&format!(
        "Regime: {} -> {} | slope change: {:+.1}bp\n",
        cmp.prior.regime.display_name(),
        cmp.latest.regime.display_name(),
        cmp.slope_change_bps
    ));
    out
}

/// `0.25 -> 3M`, `2 -> 2Y`.
pub fn fmt_maturity(years: f64) -> String {
    if years < 1.0 {
        format!("{}M", (years * 12.0).round() as i64)
    } else if (years - years.round()).abs() < 1e-9 {
        format!("{}Y", years.round() as i64)
    } else {
        format!("{years}Y")
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "n/a".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

//! Top-level application orchestration.
//!
//! `src/main.rs` only sets up logging; this module is the "real main" that:
//! - parses CLI arguments
//! - builds run configuration
//! - fetches FRED data and runs the study / curve pipelines
//! - prints reports and plots
//! - writes optional exports

use chrono::Local;
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, CurveArgs, EventArgs, ScenarioArgs, SummarizeArgs};
use crate::curve::{Scenario, classify};
use crate::data::FredClient;
use crate::domain::{CurveConfig, StudyConfig};
use crate::error::AppError;
use crate::io::CurveFile;

pub mod pipeline;

/// Parse argv. Split from [`run`] so `main` can read `--verbose` before logging starts.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Entry point for the `mr` binary.
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Events(args) => handle_events(&args),
        Command::Summarize(args) => handle_summarize(&args),
        Command::Curve(args) => handle_curve(&args),
        Command::Scenarios(args) => handle_scenarios(&args),
    }
}

fn handle_events(args: &EventArgs) -> Result<(), AppError> {
    let config = study_config_from_args(args);
    let client = FredClient::from_env()?;
    let run = pipeline::run_study(&config, &client)?;

    println!(
        "{}",
        crate::report::format_study_header(&run.series, run.n_events, &run.report, &config)
    );
    println!("{}", crate::report::format_reactions(&run.records, config.preview_rows));
    for summary in &run.summaries {
        println!("{}", crate::report::format_summary(summary, "bps"));
    }

    if let Some(path) = &config.export_path {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;
        }
        crate::io::write_reactions_csv(path, &run.records, &config.value_column)?;
        println!("Saved reactions -> {}", path.display());
    }

    Ok(())
}

fn handle_summarize(args: &SummarizeArgs) -> Result<(), AppError> {
    let records = crate::io::read_reactions_csv(&args.path, &args.value_column)?;
    info!(path = %args.path.display(), n_records = records.len(), "loaded reactions");

    let category = (!args.all_categories).then_some(args.category.as_str());
    for summary in pipeline::summaries_for(&records, category) {
        println!("{}", crate::report::format_summary(&summary, &args.unit));
    }
    Ok(())
}

fn handle_curve(args: &CurveArgs) -> Result<(), AppError> {
    let config = curve_config_from_args(args);
    let client = FredClient::from_env()?;
    let run = pipeline::run_curve(&config, &client)?;

    println!(
        "{}",
        crate::report::format_curve_analytics(
            "latest",
            &run.latest,
            &run.classification,
            config.short_maturity,
            config.long_maturity,
        )
    );

    if let (Some(prior), Some(cmp)) = (&run.prior, &run.comparison) {
        println!(
            "{}",
            crate::report::format_curve_analytics(
                "prior",
                prior,
                &cmp.prior,
                config.short_maturity,
                config.long_maturity,
            )
        );
        println!("{}", crate::report::format_comparison(cmp));
    }

    if config.plot {
        let mut curves = vec![("latest", &run.latest)];
        if let Some(prior) = &run.prior {
            curves.push(("prior", prior));
        }
        println!(
            "{}",
            crate::plot::render_curves(&curves, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export_curve {
        let file = CurveFile::new(
            &run.latest,
            &run.classification,
            config.short_maturity,
            config.long_maturity,
        );
        crate::io::write_curve_json(path, &file)?;
        println!("Saved curve -> {}", path.display());
    }

    Ok(())
}

fn handle_scenarios(args: &ScenarioArgs) -> Result<(), AppError> {
    for scenario in Scenario::ALL {
        let snapshot = scenario.snapshot()?;
        let classification = classify(&snapshot, args.short, args.long)?;

        println!(
            "{}",
            crate::report::format_curve_analytics(
                scenario.display_name(),
                &snapshot,
                &classification,
                args.short,
                args.long,
            )
        );
        if !args.no_plot {
            println!(
                "{}",
                crate::plot::render_curves(&[(scenario.display_name(), &snapshot)], args.width, args.height)
            );
        }
    }
    Ok(())
}

pub fn study_config_from_args(args: &EventArgs) -> StudyConfig {
    StudyConfig {
        series_id: args.series.clone(),
        start_date: args.start,
        end_date: args.end,
        events_path: args.events.clone(),
        scale: args.scale,
        export_path: args.export.clone(),
        value_column: args.value_column.clone(),
        category: (!args.all_categories).then(|| args.category.clone()),
        preview_rows: args.preview,
        parallel: args.parallel,
    }
}

pub fn curve_config_from_args(args: &CurveArgs) -> CurveConfig {
    CurveConfig {
        as_of: args.date.unwrap_or_else(|| Local::now().date_naive()),
        lookback_days: args.lookback,
        tenors: args.tenors.clone(),
        short_maturity: args.short,
        long_maturity: args.long,
        compare_days: (!args.no_compare).then_some(args.compare_days),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_curve: args.export_curve.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_config_respects_all_categories() {
        let cli = Cli::parse_from(["mr", "events", "--all-categories", "--scale", "1"]);
        let Command::Events(args) = cli.command else {
            panic!("expected events command");
        };
        let config = study_config_from_args(&args);
        assert!(config.category.is_none());
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn curve_config_disables_comparison() {
        let cli = Cli::parse_from(["mr", "curve", "--date", "2024-06-03", "--no-compare", "--no-plot"]);
        let Command::Curve(args) = cli.command else {
            panic!("expected curve command");
        };
        let config = curve_config_from_args(&args);
        assert_eq!(config.as_of, chrono::NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert!(config.compare_days.is_none());
        assert!(!config.plot);
        assert_eq!(config.tenors.len(), 5);
    }
}

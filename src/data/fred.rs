//! FRED API integration for daily Treasury yield series.
//!
//! Values are returned as published (percent). Missing observations (`"."`)
//! are dropped, never filled.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{CurvePoint, CurveSnapshot, Observation, Series, Tenor, days_before};
use crate::error::{AnalyticsError, AppError};

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 100_000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the FRED observations endpoint.
#[derive(Debug, Clone)]
pub struct FredConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl FredConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `FRED_API_KEY` (required) and `FRED_BASE_URL` (optional), loading `.env` first.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("FRED_BASE_URL") {
            config.base_url = url;
        }
        Ok(config)
    }
}

pub struct FredClient {
    client: Client,
    config: FredConfig,
}

impl FredClient {
    pub fn new(config: FredConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(FredConfig::from_env()?)
    }

    /// Fetch `[start, end]` (inclusive) of a series in ascending date order.
    ///
    /// An empty result is not an error here; callers decide.
    pub fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Series, AppError> {
        let mut req = self.client.get(&self.config.base_url).query(&[
            ("series_id", series_id),
            ("api_key", &self.config.api_key),
            ("file_type", "json"),
            ("sort_order", "asc"),
            ("limit", &OBS_LIMIT.to_string()),
            ("observation_start", &start.to_string()),
        ]);

        if let Some(date) = end {
            req = req.query(&[("observation_end", &date.to_string())]);
        }

        debug!(series_id, %start, ?end, "requesting FRED observations");

        let resp = req
            .send()
            .map_err(|e| AppError::new(4, format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FRED request for {series_id} failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response: {e}")))?;

        let observations = parse_observations(&body.observations)?;
        let series = Series::from_unsorted(series_id, observations)?;
        info!(series_id, n_obs = series.len(), "fetched series");
        Ok(series)
    }

    /// Build a curve from the last available value of each tenor within
    /// `[date - lookback_days, date]`.
    ///
    /// Any tenor with zero observations in the window fails the whole call.
    pub fn fetch_curve(
        &self,
        date: NaiveDate,
        tenors: &[Tenor],
        lookback_days: i64,
    ) -> Result<CurveSnapshot, AppError> {
        let start = days_before(date, lookback_days)?;
        let mut fetched = Vec::with_capacity(tenors.len());
        for &tenor in tenors {
            fetched.push((tenor, self.fetch_series(tenor.series_id(), start, Some(date))?));
        }
        curve_from_series(date, &fetched)
    }
}

/// Assemble a curve from already-fetched tenor windows, one point per tenor.
pub fn curve_from_series(date: NaiveDate, fetched: &[(Tenor, Series)]) -> Result<CurveSnapshot, AppError> {
    let mut points = Vec::with_capacity(fetched.len());

    for (tenor, series) in fetched {
        let last = last_value(series)?;
        debug!(
            tenor = tenor.display_name(),
            date = %last.date,
            value = last.value,
            "curve point"
        );
        points.push(CurvePoint::new(tenor.maturity_years(), last.value));
    }

    Ok(CurveSnapshot::new(Some(date), points)?)
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

fn parse_observations(raw: &[RawObservation]) -> Result<Vec<Observation>, AppError> {
    let mut out = Vec::with_capacity(raw.len());
    for obs in raw {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::new(4, format!("Invalid FRED date '{}': {e}", obs.date)))?;
        out.push(Observation::new(date, value));
    }
    Ok(out)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

fn last_value(series: &Series) -> Result<Observation, AnalyticsError> {
    series
        .last()
        .copied()
        .ok_or_else(|| AnalyticsError::UpstreamDataUnavailable {
            series_id: series.id().to_string(),
        })
}

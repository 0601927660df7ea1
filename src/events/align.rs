//! Event-reaction alignment.
//!
//! For each event we pick two observations from the series:
//!
//! - `pre`:  the last observation with `date <= event_date`
//! - `post`: the first observation with `date > event_date`
//!
//! and emit `reaction = (post - pre) * scale`.
//!
//! An event on an observation date uses that observation as `pre`, so the
//! reaction measures the move into the next session. Events with no `pre`
//! (before the first observation) or no `post` (on/after the last one) are
//! dropped from the output; that is policy, not an error.
//!
//! Both lookups are binary searches on the sorted series, so a run costs
//! `O(m log n)` for `m` events over `n` observations.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Event, EventSet, ReactionRecord, Series};
use crate::error::AnalyticsError;

/// Why an event produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No observation on or before the event date.
    NoPre,
    /// No observation strictly after the event date.
    NoPost,
}

/// Counts of emitted and skipped events for one alignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentReport {
    pub emitted: usize,
    pub skipped_no_pre: usize,
    pub skipped_no_post: usize,
}

impl AlignmentReport {
    pub fn skipped(&self) -> usize {
        self.skipped_no_pre + self.skipped_no_post
    }
}

/// Aligns events against a series and scales the pre/post move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionAligner {
    scale: f64,
}

impl ReactionAligner {
    /// `scale` converts raw deltas into reporting units (100 for percent → bp).
    pub fn new(scale: f64) -> Result<Self, AnalyticsError> {
        if !(scale.is_finite() && scale != 0.0) {
            return Err(AnalyticsError::InvalidScale { scale });
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Align every event; records come back in input event order.
    pub fn align(&self, series: &Series, events: &EventSet) -> Vec<ReactionRecord> {
        self.align_with_report(series, events).0
    }

    /// Same as [`align`](Self::align), plus counts of skipped events.
    pub fn align_with_report(&self, series: &Series, events: &EventSet) -> (Vec<ReactionRecord>, AlignmentReport) {
        let outcomes = events
            .events()
            .iter()
            .map(|event| self.align_one(series, event))
            .collect();
        collect_outcomes(events, outcomes)
    }

    /// Parallel variant of [`align`](Self::align).
    pub fn align_par(&self, series: &Series, events: &EventSet) -> Vec<ReactionRecord> {
        self.align_par_with_report(series, events).0
    }

    /// Parallel variant of [`align_with_report`](Self::align_with_report).
    ///
    /// Each event is looked up independently against the shared series; the
    /// indexed collect keeps output in input event order.
    pub fn align_par_with_report(&self, series: &Series, events: &EventSet) -> (Vec<ReactionRecord>, AlignmentReport) {
        let outcomes = events
            .events()
            .par_iter()
            .map(|event| self.align_one(series, event))
            .collect();
        collect_outcomes(events, outcomes)
    }

    /// Align a single event.
    pub fn align_one(&self, series: &Series, event: &Event) -> Result<ReactionRecord, SkipReason> {
        let pre = series
            .last_at_or_before(event.event_date)
            .ok_or(SkipReason::NoPre)?;
        let post = series.first_after(event.event_date).ok_or(SkipReason::NoPost)?;

        Ok(ReactionRecord {
            event_id: event.event_id.clone(),
            event_type: event.event_type.clone(),
            event_date: event.event_date,
            reaction: Some((post.value - pre.value) * self.scale),
        })
    }
}

fn collect_outcomes(
    events: &EventSet,
    outcomes: Vec<Result<ReactionRecord, SkipReason>>,
) -> (Vec<ReactionRecord>, AlignmentReport) {
    let mut report = AlignmentReport::default();
    let mut out = Vec::with_capacity(outcomes.len());

    for (event, outcome) in events.events().iter().zip(outcomes) {
        match outcome {
            Ok(record) => out.push(record),
            Err(reason) => {
                debug!(
                    event_id = %event.event_id,
                    event_type = %event.event_type,
                    event_date = %event.event_date,
                    ?reason,
                    "skipping event"
                );
                match reason {
                    SkipReason::NoPre => report.skipped_no_pre += 1,
                    SkipReason::NoPost => report.skipped_no_post += 1,
                }
            }
        }
    }

    report.emitted = out.len();
    (out, report)
}

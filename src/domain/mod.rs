//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - time-series inputs (`Observation`, `Series`)
//! - macro events and aligned outputs (`Event`, `EventSet`, `ReactionRecord`, `ReactionSummary`)
//! - curve inputs and outputs (`CurvePoint`, `CurveSnapshot`, `Regime`, `CurveClassification`)
//! - run configuration (`StudyConfig`, `CurveConfig`, `Tenor`)

pub mod types;

pub use types::*;

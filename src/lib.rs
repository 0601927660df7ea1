//! `macro-rates` library crate.
//!
//! Two analytics cores with thin I/O around them:
//!
//! - event studies: align macro announcements against a daily rate series and
//!   summarize the scaled 1-day reactions per category (`events`)
//! - curve regimes: two-point slope of a Treasury curve mapped to
//!   Normal / Flat / Inverted (`curve`)
//!
//! The binary (`mr`) is a thin wrapper around this library so the analytics
//! can be tested without spawning processes or touching the network.

pub mod app;
pub mod cli;
pub mod curve;
pub mod data;
pub mod domain;
pub mod error;
pub mod events;
pub mod io;
pub mod plot;
pub mod report;

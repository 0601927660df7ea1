//! Remote data retrieval.

pub mod fred;

pub use fred::{FredClient, FredConfig, curve_from_series};

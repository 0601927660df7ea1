//! Yield curve shape analytics.
//!
//! - two-point slope and regime bands (`classify`)
//! - fixed synthetic curve shapes (`scenarios`)

pub mod classify;
pub mod scenarios;

pub use classify::*;
pub use scenarios::*;

//! Macro event studies.
//!
//! - align each event against a daily series (`align`)
//! - aggregate reactions per event category (`summary`)

pub mod align;
pub mod summary;

pub use align::*;
pub use summary::*;

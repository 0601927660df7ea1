//! Reporting utilities: formatted terminal output for studies and curves.

pub mod format;

pub use format::*;

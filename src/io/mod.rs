//! Input/output helpers.
//!
//! - macro event CSV ingest (`events`)
//! - reaction CSV export/reload (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod events;
pub mod export;

pub use curve::*;
pub use events::*;
pub use export::*;

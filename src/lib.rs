//! Parse WebAssign gradebook report exports and re-emit the scores as
//! CSV, with optional percentage conversion and key-column cleanup.

pub mod dates;
pub mod dialect;
pub mod error;
pub mod output;
pub mod project;
pub mod report;

pub use error::{Error, Result};

//! Tracing/logging setup shared by the binaries.

/// Subscriber construction (filters, output format).
pub mod tracing;

pub use tracing::{init, LogFormat, ParseLogFormatError};

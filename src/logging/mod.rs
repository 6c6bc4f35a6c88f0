//! Structured logging with batch context.
//!
//! Provides logging macros and utilities that include batch_id and the record
//! position in every log message for easy correlation.

pub mod structured;

pub use structured::*;

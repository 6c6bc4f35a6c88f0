//! Batch ingestion module.
//!
//! Decodes a batch of raw JSON events into a caller-chosen record type. Each
//! record succeeds or fails on its own; the batch's [`FailurePolicy`] decides
//! whether a failure stops the batch.

pub mod batch;
pub mod context;

pub use batch::*;
pub use context::*;

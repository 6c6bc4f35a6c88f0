//! Logwire Core - Null-aware field normalization for log ingestion
//!
//! This crate decodes loosely-typed JSON events into strongly-typed records
//! without losing the difference between a missing field, an explicit `null`,
//! and a present zero or empty value. The implementation prioritizes:
//!
//! 1. **Fidelity** - Every scalar keeps its three states through decode and encode
//! 2. **Logging** - Every batch decision logged with batch and record context
//! 3. **Performance** - Borrowed tokens where possible, one decode pass per event
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `null` - `Nullable<T>` scalars (text, integers, float, bool)
//! - `timestamp` - Source timestamp layouts normalized to one canonical instant
//! - `codec` - Token model, serde visitor adapter and omit-if-empty encoding
//! - `ingest` - Batch decoding with per-record outcomes
//! - `alert` - Alert record shape at the delivery boundary
//! - `error` - Decode errors
//! - `logging` - Structured logging with batch context

pub mod alert;
pub mod codec;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod null;
pub mod timestamp;

use serde::de::DeserializeOwned;

pub use codec::{EmptyFields, FieldEncoder, ObjectEncoder};
pub use error::{DecodeError, DecodeResult, ParseFailure};
pub use ingest::{BatchContext, BatchResult, FailurePolicy, IngestOptions, RecordOutcome};
pub use null::Nullable;
pub use timestamp::{Timestamp, TimestampLayout};

/// Initialize the process-wide logger.
///
/// Honors `RUST_LOG` when set, `info` otherwise. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Decode a batch of raw JSON events into `R`.
///
/// Builds a fresh [`BatchContext`] from `options`; use
/// [`ingest::decode_batch`] directly to supply your own context.
pub fn ingest_batch<R, S>(events: &[S], options: IngestOptions) -> BatchResult<R>
where
    R: DeserializeOwned,
    S: AsRef<str>,
{
    init_logging();

    let ctx = BatchContext::new(options);

    log::info!(
        "BATCH_RECEIVED batch_id={} events={} on_error={:?}",
        ctx.batch_id,
        events.len(),
        ctx.options.on_error
    );

    ingest::decode_batch(&ctx, events)
}

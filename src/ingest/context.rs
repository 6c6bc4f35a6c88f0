//! Batch context and ingest options.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// What to do with the rest of a batch when one record fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Reject the failing record and keep going.
    #[default]
    SkipRecord,
    /// Stop at the first failing record.
    AbortBatch,
}

/// Caller-supplied options for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    pub on_error: FailurePolicy,
}

impl IngestOptions {
    pub fn abort_on_error() -> Self {
        Self {
            on_error: FailurePolicy::AbortBatch,
        }
    }
}

/// Context for a batch of records.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub batch_id: String,
    pub received_at: DateTime<Utc>,
    pub options: IngestOptions,
}

impl BatchContext {
    pub fn new(options: IngestOptions) -> Self {
        let batch_id = format!("batch-{}", &Uuid::new_v4().simple().to_string()[..8]);

        Self {
            batch_id,
            received_at: Utc::now(),
            options,
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.batch_id)
    }
}

impl Default for BatchContext {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_shape() {
        let ctx = BatchContext::default();
        assert!(ctx.batch_id.starts_with("batch-"));
        assert_eq!(ctx.batch_id.len(), "batch-".len() + 8);
        assert_eq!(ctx.options.on_error, FailurePolicy::SkipRecord);
        assert!(ctx.received_at <= Utc::now());
    }

    #[test]
    fn test_batch_ids_differ() {
        let a = BatchContext::default();
        let b = BatchContext::default();
        assert_ne!(a.batch_id, b.batch_id);
    }

    #[test]
    fn test_log_context_carries_batch() {
        let ctx = BatchContext::new(IngestOptions::abort_on_error());
        assert_eq!(ctx.log_context().to_string(), format!("[batch={}]", ctx.batch_id));
        assert_eq!(ctx.options.on_error, FailurePolicy::AbortBatch);
    }
}

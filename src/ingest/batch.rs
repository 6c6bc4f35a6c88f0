//! Batch decoding.
//!
//! Every event is decoded on its own into `R`. Null-aware scalars and
//! timestamp layouts inside `R` do the normalization; a malformed field fails
//! only its own record.

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::{DecodeError, DecodeResult};
use crate::{log_debug, log_error, log_info, log_warn};

use super::context::{BatchContext, FailurePolicy};

/// Result of decoding a single event.
#[derive(Debug)]
pub struct RecordOutcome<R> {
    /// Position of the event in the batch.
    pub index: usize,
    pub outcome: Result<R, DecodeError>,
}

impl<R> RecordOutcome<R> {
    pub fn accepted(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn record(&self) -> Option<&R> {
        self.outcome.as_ref().ok()
    }

    pub fn rejection_reason(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|e| e.to_string())
    }
}

/// Result of decoding a batch.
#[derive(Debug)]
pub struct BatchResult<R> {
    pub batch_id: String,
    pub received_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    /// Index of the record that stopped the batch under `AbortBatch`.
    pub aborted_at: Option<usize>,
    pub records: Vec<RecordOutcome<R>>,
}

impl<R> BatchResult<R> {
    pub fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }

    /// Accepted records in batch order.
    pub fn accepted(&self) -> impl Iterator<Item = &R> {
        self.records.iter().filter_map(RecordOutcome::record)
    }

    pub fn into_accepted(self) -> Vec<R> {
        self.records
            .into_iter()
            .filter_map(|r| r.outcome.ok())
            .collect()
    }
}

/// Decode one raw JSON event.
///
/// A field the record type rejects is reported as [`DecodeError::Field`]
/// with the failing operation; unparseable input as [`DecodeError::Json`].
pub fn decode_event<R: DeserializeOwned>(raw: &str) -> DecodeResult<R> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode a batch of raw JSON events.
///
/// Records past an aborting failure are not decoded and do not appear in
/// `records`; they still count towards `received_count`.
pub fn decode_batch<R, S>(ctx: &BatchContext, events: &[S]) -> BatchResult<R>
where
    R: DeserializeOwned,
    S: AsRef<str>,
{
    let log_ctx = ctx.log_context();
    let mut records = Vec::with_capacity(events.len());
    let mut accepted = 0;
    let mut rejected = 0;
    let mut aborted_at = None;

    log_debug!(log_ctx, "BATCH_START", received = events.len());

    for (index, raw) in events.iter().enumerate() {
        let record_ctx = log_ctx.with_record(index);
        let outcome = decode_event::<R>(raw.as_ref());

        match &outcome {
            Ok(_) => accepted += 1,
            Err(e) => {
                rejected += 1;
                log_warn!(
                    record_ctx,
                    "RECORD_DECODE_FAILED",
                    op = e.op(),
                    error = e.to_string()
                );
            }
        }

        let failed = outcome.is_err();
        records.push(RecordOutcome { index, outcome });

        if failed && ctx.options.on_error == FailurePolicy::AbortBatch {
            aborted_at = Some(index);
            log_error!(
                log_ctx,
                "BATCH_ABORTED",
                at = index,
                remaining = events.len() - index - 1
            );
            break;
        }
    }

    log_info!(
        log_ctx,
        "BATCH_COMPLETE",
        received = events.len(),
        accepted = accepted,
        rejected = rejected,
        elapsed_ms = (Utc::now() - ctx.received_at).num_milliseconds()
    );

    BatchResult {
        batch_id: ctx.batch_id.clone(),
        received_count: events.len(),
        accepted_count: accepted,
        rejected_count: rejected,
        aborted_at,
        records,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::ingest::context::IngestOptions;
    use crate::null::{NullInt64, NullString};
    use crate::timestamp::{format, Timestamp};

    #[derive(Debug, Deserialize)]
    struct Event {
        #[serde(with = "format::fluentd")]
        time: Timestamp,
        user: NullString,
        #[serde(default)]
        bytes: NullInt64,
    }

    fn events() -> Vec<&'static str> {
        vec![
            r#"{"time":"2020-01-02 03:04:05 -0700","user":"alice","bytes":12}"#,
            r#"{"time":"yesterday","user":"bob"}"#,
            r#"{"time":"2020-01-02 03:04:06 +0000","user":null,"bytes":""}"#,
        ]
    }

    #[test]
    fn test_skip_record_keeps_going() {
        let ctx = BatchContext::default();
        let result: BatchResult<Event> = decode_batch(&ctx, &events());

        assert_eq!(result.batch_id, ctx.batch_id);
        assert_eq!(result.received_count, 3);
        assert_eq!(result.accepted_count, 2);
        assert_eq!(result.rejected_count, 1);
        assert!(!result.is_aborted());
        assert_eq!(result.records.len(), 3);

        let bad = &result.records[1];
        assert_eq!(bad.index, 1);
        assert!(!bad.accepted());
        assert!(bad.rejection_reason().unwrap().contains("ReadTimestampFluentd"));

        let third = result.records[2].record().unwrap();
        assert!(third.user.is_null());
        assert!(third.bytes.is_null());
    }

    #[test]
    fn test_abort_batch_stops_at_first_failure() {
        let ctx = BatchContext::new(IngestOptions::abort_on_error());
        let result: BatchResult<Event> = decode_batch(&ctx, &events());

        assert_eq!(result.aborted_at, Some(1));
        assert_eq!(result.received_count, 3);
        assert_eq!(result.accepted_count, 1);
        assert_eq!(result.rejected_count, 1);
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_accepted_records_normalized() {
        let ctx = BatchContext::default();
        let result: BatchResult<Event> = decode_batch(&ctx, &events());
        let accepted = result.into_accepted();

        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].time.canonical(), "2020-01-02 10:04:05.000000000");
        assert_eq!(accepted[0].user.value(), "alice");
        assert_eq!(*accepted[0].bytes.value(), 12);
    }

    #[test]
    fn test_missing_field_and_garbage() {
        let ctx = BatchContext::default();
        let raw = vec![
            r#"{"time":"2020-01-02 03:04:05 +0000"}"#.to_string(),
            "not json".to_string(),
            String::new(),
        ];
        let result: BatchResult<Event> = decode_batch(&ctx, &raw);

        assert_eq!(result.accepted_count, 1);
        assert!(!result.records[0].record().unwrap().user.exists());
        assert!(matches!(result.records[1].outcome, Err(DecodeError::Json(_))));
        assert!(matches!(result.records[2].outcome, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_bad_field_is_attributed_to_its_operation() {
        let ctx = BatchContext::default();
        let raw = [r#"{"time":"2020-01-02 03:04:05 +0000","user":"x","bytes":"12x"}"#];
        let result: BatchResult<Event> = decode_batch(&ctx, &raw);

        let err = result.records[0].outcome.as_ref().unwrap_err();
        assert!(matches!(err, DecodeError::Field { .. }));
        assert_eq!(err.op(), Some("ReadNullInt64"));
        assert!(!err.to_string().starts_with("malformed JSON"));

        let err = decode_event::<Event>(r#"{"time":"soon","user":"x"}"#).unwrap_err();
        assert_eq!(err.op(), Some("ReadTimestampFluentd"));
    }

    #[test]
    fn test_empty_batch() {
        let ctx = BatchContext::default();
        let result: BatchResult<Event> = decode_batch::<Event, &str>(&ctx, &[]);
        assert_eq!(result.received_count, 0);
        assert!(result.records.is_empty());
    }
}

// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batch orchestration.
//!
//! Each record runs through its own state machine:
//!
//! ```text
//! RawRecord -> [Decode]  -> failure             -> ProcessingFailed
//!           -> [Extract] -> control message     -> Dropped
//!                        -> no events           -> Dropped
//!                        -> unknown type        -> ProcessingFailed
//!           -> [Route]   -> bad timestamp       -> ProcessingFailed
//!           -> [Encode]  -> over the size limit -> ProcessingFailed
//!                        -> Ok(data)
//! ```
//!
//! Errors are caught at the record boundary, so one bad record never changes the outcome
//! of another and never aborts the batch. The transformer holds no mutable state and
//! performs no I/O; retries and backups belong to the delivery channel.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use crate::config::TransformerConfig;
use crate::decoder::decode_record;
use crate::encoder::{RecordEncoder, RoutedEvent};
use crate::error::TransformError;
use crate::extractor::{extract_events, Extraction};
use crate::router::IndexRouter;
use crate::wire::{Outcome, OutcomeRecord, RawRecord, TransformationEvent, TransformationResponse};

/// Why a record was dropped. Both are normal terminal states, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    ControlMessage,
    NoEvents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Disposition {
    Deliver(String),
    Drop(DropReason),
}

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ok: usize,
    pub dropped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Ok(_) => self.ok += 1,
            Outcome::Dropped => self.dropped += 1,
            Outcome::ProcessingFailed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.dropped + self.failed
    }
}

/// Decodes, reshapes and re-encodes every record of a batch.
#[derive(Debug, Clone)]
pub struct BatchTransformer {
    router: IndexRouter,
    encoder: RecordEncoder,
}

impl BatchTransformer {
    #[must_use]
    pub fn new(config: Arc<TransformerConfig>) -> Self {
        Self {
            router: IndexRouter::new(config.index_prefix.clone()),
            encoder: RecordEncoder::new(config.max_record_bytes),
        }
    }

    /// Produces exactly one outcome per input record, in input order.
    pub fn transform_batch(&self, event: &TransformationEvent) -> TransformationResponse {
        let span = info_span!("transform_batch", invocation_id = %event.invocation_id);
        let _guard = span.enter();

        let mut summary = BatchSummary::default();
        let records = event
            .records
            .iter()
            .map(|record| {
                let outcome = self.transform_record(record);
                summary.record(&outcome.outcome);
                outcome
            })
            .collect::<Vec<_>>();

        info!(
            records = summary.total(),
            ok = summary.ok,
            dropped = summary.dropped,
            failed = summary.failed,
            "Transformed batch"
        );
        TransformationResponse { records }
    }

    /// Runs one record to a terminal state. Never fails: errors become
    /// `ProcessingFailed` carrying the original record id.
    pub fn transform_record(&self, record: &RawRecord) -> OutcomeRecord {
        match self.process(&record.data) {
            Ok(Disposition::Deliver(data)) => OutcomeRecord::ok(record.record_id.as_str(), data),
            Ok(Disposition::Drop(reason)) => {
                debug!(record_id = %record.record_id, ?reason, "Dropping record");
                OutcomeRecord::dropped(record.record_id.as_str())
            }
            Err(e) => {
                warn!(record_id = %record.record_id, "Failed to transform record: {e}");
                OutcomeRecord::processing_failed(record.record_id.as_str())
            }
        }
    }

    fn process(&self, data: &str) -> Result<Disposition, TransformError> {
        let payload = decode_record(data)?;

        let events = match extract_events(payload)? {
            Extraction::Control => return Ok(Disposition::Drop(DropReason::ControlMessage)),
            Extraction::Events(events) if events.is_empty() => {
                return Ok(Disposition::Drop(DropReason::NoEvents))
            }
            Extraction::Events(events) => events,
        };

        // every event of the record is routed before anything is encoded
        let routed = events
            .into_iter()
            .map(|event| -> Result<RoutedEvent, TransformError> {
                let route = self.router.route(event.timestamp.as_ref())?;
                Ok(RoutedEvent { event, route })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match self.encoder.encode(&routed)? {
            Some(data) => Ok(Disposition::Deliver(data)),
            None => Ok(Disposition::Drop(DropReason::NoEvents)),
        }
    }
}

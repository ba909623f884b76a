// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation and response documents exchanged with the delivery channel.
//!
//! Record `data` is kept as the base64 text the channel sends. Reversing that layer is
//! the decoder's job, so a corrupt record fails on its own instead of failing the
//! parse of the whole invocation.

use serde::{Deserialize, Serialize};

/// One transformation invocation: a batch of records from the delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationEvent {
    /// Used for diagnostics only.
    pub invocation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    /// Present when the channel reads from a stream instead of direct puts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kinesis_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub record_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
    /// Base64 text as received.
    pub data: String,
}

/// The reply to a [`TransformationEvent`], one outcome per input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationResponse {
    pub records: Vec<OutcomeRecord>,
}

/// Terminal state of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Forward to the index store. Holds the base64 encoded body.
    Ok(String),
    /// Discard without backup.
    Dropped,
    /// Back up the original record for inspection.
    ProcessingFailed,
}

impl Outcome {
    pub fn result(&self) -> RecordResult {
        match self {
            Outcome::Ok(_) => RecordResult::Ok,
            Outcome::Dropped => RecordResult::Dropped,
            Outcome::ProcessingFailed => RecordResult::ProcessingFailed,
        }
    }
}

/// Result label as the channel spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

/// Per-record reply. `data` only exists on the wire for `Ok`, which [`Outcome`]
/// enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "OutcomeRecordWire", try_from = "OutcomeRecordWire")]
pub struct OutcomeRecord {
    pub record_id: String,
    pub outcome: Outcome,
}

impl OutcomeRecord {
    pub fn ok(record_id: impl Into<String>, data: String) -> Self {
        Self {
            record_id: record_id.into(),
            outcome: Outcome::Ok(data),
        }
    }

    pub fn dropped(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            outcome: Outcome::Dropped,
        }
    }

    pub fn processing_failed(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            outcome: Outcome::ProcessingFailed,
        }
    }

    pub fn result(&self) -> RecordResult {
        self.outcome.result()
    }

    /// Base64 body, only for `Ok` outcomes.
    pub fn data(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Ok(data) => Some(data),
            Outcome::Dropped | Outcome::ProcessingFailed => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeRecordWire {
    record_id: String,
    result: RecordResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl From<OutcomeRecord> for OutcomeRecordWire {
    fn from(record: OutcomeRecord) -> Self {
        let result = record.result();
        let data = match record.outcome {
            Outcome::Ok(data) => Some(data),
            Outcome::Dropped | Outcome::ProcessingFailed => None,
        };
        Self {
            record_id: record.record_id,
            result,
            data,
        }
    }
}

impl TryFrom<OutcomeRecordWire> for OutcomeRecord {
    type Error = String;

    fn try_from(wire: OutcomeRecordWire) -> Result<Self, Self::Error> {
        let outcome = match (wire.result, wire.data) {
            (RecordResult::Ok, Some(data)) => Outcome::Ok(data),
            (RecordResult::Ok, None) => {
                return Err(format!("record {} is Ok but has no data", wire.record_id))
            }
            (RecordResult::Dropped, _) => Outcome::Dropped,
            (RecordResult::ProcessingFailed, _) => Outcome::ProcessingFailed,
        };
        Ok(Self {
            record_id: wire.record_id,
            outcome,
        })
    }
}

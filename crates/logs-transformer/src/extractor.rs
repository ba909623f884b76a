// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Expands a decoded subscription payload into independent log events.

use std::str::FromStr;

use tracing::debug;

use crate::constants::{CONTROL_MESSAGE, DATA_MESSAGE};
use crate::decoder::{DecodedPayload, RawTimestamp};
use crate::error::ExtractionError;

/// Kind of subscription payload, decided once after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Carries log lines.
    Data,
    /// Reachability check from the subscription. Not an error, never indexed.
    Control,
}

impl FromStr for MessageKind {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DATA_MESSAGE => Ok(MessageKind::Data),
            CONTROL_MESSAGE => Ok(MessageKind::Control),
            other => Err(ExtractionError::UnknownMessageType(other.to_string())),
        }
    }
}

/// One log line to be indexed, carrying the identifiers of the stream it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub id: String,
    /// Trimmed of surrounding whitespace.
    pub message: String,
    /// Line timestamp, or the payload timestamp when the line has none.
    pub timestamp: Option<RawTimestamp>,
    pub owner: String,
    pub log_group: String,
    pub log_stream: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Control,
    /// Possibly empty.
    Events(Vec<LogEvent>),
}

/// Classifies the payload and, for data messages, extracts every log line.
///
/// # Errors
///
/// Returns [`ExtractionError::UnknownMessageType`] when the discriminator is neither
/// a data nor a control message.
pub fn extract_events(payload: DecodedPayload) -> Result<Extraction, ExtractionError> {
    match payload.message_type.parse::<MessageKind>()? {
        MessageKind::Control => {
            debug!(log_group = %payload.log_group, "Received control message");
            Ok(Extraction::Control)
        }
        MessageKind::Data => {
            let DecodedPayload {
                owner,
                log_group,
                log_stream,
                log_events,
                timestamp: payload_timestamp,
                ..
            } = payload;

            let events = log_events
                .into_iter()
                .map(|line| LogEvent {
                    id: line.id,
                    message: line.message.trim().to_string(),
                    timestamp: line.timestamp.or_else(|| payload_timestamp.clone()),
                    owner: owner.clone(),
                    log_group: log_group.clone(),
                    log_stream: log_stream.clone(),
                })
                .collect::<Vec<_>>();

            debug!(count = events.len(), log_group = %log_group, "Extracted log events");
            Ok(Extraction::Events(events))
        }
    }
}

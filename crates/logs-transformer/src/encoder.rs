// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Serializes the events of one record into the body the index store ingests.
//!
//! The body is newline-delimited JSON in bulk layout. The delivery channel prefixes
//! every outgoing record with an action line of its own, so the first document is
//! written bare and each following document gets an explicit action naming its index:
//!
//! ```text
//! {"@id":"1",...,"@index":"logs-2024-03-01"}
//! {"index":{"_index":"logs-2024-03-01"}}
//! {"@id":"2",...,"@index":"logs-2024-03-01"}
//! ```
//!
//! Every document also carries its computed index under `@index`, so events of a single
//! record that fall on different UTC days keep their own index.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::EncodeError;
use crate::extractor::LogEvent;
use crate::router::Route;

/// An event together with the index it was routed to.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEvent {
    pub event: LogEvent,
    pub route: Route,
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkActionTarget<'a>,
}

#[derive(Serialize)]
struct BulkActionTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
}

/// Encodes the merged events of one raw record into base64 `data`.
#[derive(Debug, Clone, Copy)]
pub struct RecordEncoder {
    max_record_bytes: usize,
}

impl RecordEncoder {
    pub fn new(max_record_bytes: usize) -> Self {
        Self { max_record_bytes }
    }

    /// Returns `None` for an empty event sequence: there is nothing to forward.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::RecordTooLarge`] when the encoded data exceeds the
    /// configured limit.
    pub fn encode(&self, events: &[RoutedEvent]) -> Result<Option<String>, EncodeError> {
        if events.is_empty() {
            return Ok(None);
        }

        let body = bulk_body(events)?;
        let encoded = STANDARD.encode(body.as_bytes());
        if encoded.len() > self.max_record_bytes {
            return Err(EncodeError::RecordTooLarge {
                size: encoded.len(),
                limit: self.max_record_bytes,
            });
        }

        trace!(
            events = events.len(),
            bytes = encoded.len(),
            "Encoded record"
        );
        Ok(Some(encoded))
    }
}

/// The JSON document indexed for one event.
///
/// When the message is itself a JSON object its keys are merged in, overriding the
/// source fields on collision. `@timestamp` and `@index` always keep the routed values.
pub fn document(routed: &RoutedEvent) -> Map<String, Value> {
    let RoutedEvent { event, route } = routed;

    let mut doc = Map::new();
    doc.insert("@id".to_string(), Value::from(event.id.as_str()));
    doc.insert("@owner".to_string(), Value::from(event.owner.as_str()));
    doc.insert("@log_group".to_string(), Value::from(event.log_group.as_str()));
    doc.insert("@log_stream".to_string(), Value::from(event.log_stream.as_str()));
    doc.insert("@message".to_string(), Value::from(event.message.as_str()));

    match serde_json::from_str::<Value>(&event.message) {
        Ok(Value::Object(fields)) => doc.extend(fields),
        _ => trace!(id = %event.id, "Message is not a JSON object"),
    }

    // routing fields always reflect the computed route
    doc.insert(
        "@timestamp".to_string(),
        Value::from(route.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    doc.insert("@index".to_string(), Value::from(route.index.as_str()));
    doc
}

/// Newline-delimited bulk body for the events of one record.
pub fn bulk_body(events: &[RoutedEvent]) -> Result<String, EncodeError> {
    let mut body = String::new();
    for (position, routed) in events.iter().enumerate() {
        if position > 0 {
            let action = BulkAction {
                index: BulkActionTarget {
                    index: &routed.route.index,
                },
            };
            body.push_str(&serde_json::to_string(&action)?);
            body.push('\n');
        }
        body.push_str(&serde_json::to_string(&document(routed))?);
        body.push('\n');
    }
    Ok(body)
}

/// A document as the index store sees it after splitting a bulk body.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    /// Index named by the preceding action line, `None` for the leading document.
    pub action_index: Option<String>,
    pub source: Map<String, Value>,
}

/// Splits a bulk body back into its documents, the way the index store does.
///
/// # Errors
///
/// Fails when a non-empty line is not a JSON object.
pub fn split_bulk_body(body: &str) -> Result<Vec<BulkDocument>, serde_json::Error> {
    let mut documents = Vec::new();
    let mut pending_index = None;

    for line in body.lines().filter(|line| !line.trim().is_empty()) {
        let source: Map<String, Value> = serde_json::from_str(line)?;
        if let Some(index) = action_index(&source) {
            pending_index = Some(index.to_string());
            continue;
        }
        documents.push(BulkDocument {
            action_index: pending_index.take(),
            source,
        });
    }
    Ok(documents)
}

fn action_index(line: &Map<String, Value>) -> Option<&str> {
    if line.len() != 1 {
        return None;
    }
    line.get("index")?.get("_index")?.as_str()
}

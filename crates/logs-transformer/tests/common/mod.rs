// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Builders for subscription payloads and delivery channel invocations

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{write::GzEncoder, Compression};
use logs_transformer::wire::{RawRecord, TransformationEvent};
use serde_json::{json, Value};
use std::io::Write;

/// Gzip then base64, the way the log subscription ships payloads
pub fn encode_payload(payload: &Value) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(payload.to_string().as_bytes())
        .expect("failed to compress payload");
    STANDARD.encode(encoder.finish().expect("failed to finish gzip stream"))
}

/// Data message with the given `(id, timestamp_ms, message)` log lines
pub fn data_message(lines: &[(&str, i64, &str)]) -> Value {
    let log_events = lines
        .iter()
        .map(|(id, timestamp, message)| json!({"id": id, "timestamp": timestamp, "message": message}))
        .collect::<Vec<_>>();
    json!({
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/lambda/tasks-manager-create",
        "logStream": "2024/03/01/[$LATEST]0123456789abcdef",
        "subscriptionFilters": ["tasks-logs-to-firehose"],
        "logEvents": log_events
    })
}

pub fn control_message() -> Value {
    json!({
        "messageType": "CONTROL_MESSAGE",
        "owner": "CloudwatchLogs",
        "logGroup": "",
        "logStream": "",
        "subscriptionFilters": [],
        "logEvents": [
            {
                "id": "",
                "timestamp": 1_709_300_000_000_i64,
                "message": "CWL CONTROL MESSAGE: Checking health of destination Firehose."
            }
        ]
    })
}

pub fn record(record_id: &str, data: String) -> RawRecord {
    RawRecord {
        record_id: record_id.to_string(),
        approximate_arrival_timestamp: Some(1_709_300_000_000),
        data,
    }
}

/// Gzipped payload cut in half
#[allow(dead_code)]
pub fn truncated_payload(payload: &Value) -> String {
    let compressed = STANDARD
        .decode(encode_payload(payload))
        .expect("failed to decode own payload");
    STANDARD.encode(&compressed[..compressed.len() / 2])
}

pub fn invocation(records: Vec<RawRecord>) -> TransformationEvent {
    TransformationEvent {
        invocation_id: "00540a87-5050-496a-84e4-e7d92bbaf5e2".to_string(),
        delivery_stream_arn: Some(
            "arn:aws:firehose:us-east-1:123456789012:deliverystream/tasks-logs".to_string(),
        ),
        source_kinesis_stream_arn: None,
        region: Some("us-east-1".to_string()),
        records,
    }
}

/// Base64 `data` of an Ok outcome back to text
#[allow(dead_code)]
pub fn decode_data(data: &str) -> String {
    String::from_utf8(STANDARD.decode(data).expect("outcome data is not base64"))
        .expect("outcome data is not utf-8")
}

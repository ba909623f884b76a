// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Reverses the two layers the log subscription wraps around its payload: base64
//! transport encoding, then gzip. The result is parsed as the subscription JSON
//! document:
//!
//! ```json
//! {
//!   "messageType": "DATA_MESSAGE",
//!   "owner": "123456789012",
//!   "logGroup": "log_group_name",
//!   "logStream": "log_stream_name",
//!   "subscriptionFilters": ["subscription_filter_name"],
//!   "logEvents": [
//!     {"id": "0123...", "timestamp": 1510109208016, "message": "log message 1"}
//!   ]
//! }
//! ```

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::trace;

use crate::error::DecodeError;

/// Structured content of one raw record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    /// Kept as text here; classified by the extractor.
    pub message_type: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub log_group: String,
    #[serde(default)]
    pub log_stream: String,
    #[serde(default)]
    pub subscription_filters: Vec<String>,
    #[serde(default)]
    pub log_events: Vec<RawLogEvent>,
    /// Fallback for log lines without a timestamp of their own.
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLogEvent {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    /// Non-string messages are kept as their JSON text.
    #[serde(deserialize_with = "message_text")]
    pub message: String,
}

fn message_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// A timestamp as it appears in the payload. Interpretation is left to the router
/// so that a bad value fails routing rather than decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Epoch milliseconds.
    Millis(i64),
    /// Epoch milliseconds with a fractional part.
    Fractional(f64),
    /// Epoch milliseconds as a string, or RFC 3339.
    Text(String),
}

/// Decodes the `data` of one raw record.
///
/// # Errors
///
/// Returns [`DecodeError`] when the base64 text is invalid, the gzip stream is corrupt
/// or truncated, or the decompressed bytes are not a subscription document.
pub fn decode_record(data: &str) -> Result<DecodedPayload, DecodeError> {
    let compressed = STANDARD.decode(data)?;

    let mut json = Vec::with_capacity(compressed.len().saturating_mul(4));
    MultiGzDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
    trace!(
        compressed = compressed.len(),
        decompressed = json.len(),
        "Decompressed record"
    );

    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn encode(payload: &[u8]) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload).unwrap();
        STANDARD.encode(encoder.finish().unwrap())
    }

    const DATA_PAYLOAD: &str = r#"{
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/lambda/tasks-create",
        "logStream": "2024/03/01/[$LATEST]abc",
        "subscriptionFilters": ["logs-to-firehose"],
        "logEvents": [
            {"id": "1", "timestamp": 1709337599999, "message": "first"},
            {"id": "2", "timestamp": "1709337600000", "message": "second"},
            {"id": "3", "message": "third"}
        ]
    }"#;

    #[test]
    fn test_decode_data_message() {
        let payload = decode_record(&encode(DATA_PAYLOAD.as_bytes())).unwrap();

        assert_eq!(payload.message_type, "DATA_MESSAGE");
        assert_eq!(payload.owner, "123456789012");
        assert_eq!(payload.log_group, "/aws/lambda/tasks-create");
        assert_eq!(payload.subscription_filters, vec!["logs-to-firehose"]);
        assert_eq!(payload.log_events.len(), 3);
        assert_eq!(
            payload.log_events[0].timestamp,
            Some(RawTimestamp::Millis(1_709_337_599_999))
        );
        assert_eq!(
            payload.log_events[1].timestamp,
            Some(RawTimestamp::Text("1709337600000".to_string()))
        );
        assert_eq!(payload.log_events[2].timestamp, None);
        assert_eq!(payload.timestamp, None);
    }

    #[test]
    fn test_decode_control_message_without_events() {
        let payload =
            decode_record(&encode(br#"{"messageType": "CONTROL_MESSAGE"}"#)).unwrap();
        assert_eq!(payload.message_type, "CONTROL_MESSAGE");
        assert!(payload.log_events.is_empty());
    }

    #[test]
    fn test_decode_concatenated_gzip_members() {
        let mut first = GzEncoder::new(Vec::new(), Compression::fast());
        first.write_all(br#"{"messageType": "#).unwrap();
        let mut bytes = first.finish().unwrap();

        let mut second = GzEncoder::new(Vec::new(), Compression::fast());
        second.write_all(br#""CONTROL_MESSAGE"}"#).unwrap();
        bytes.extend(second.finish().unwrap());

        let payload = decode_record(&STANDARD.encode(bytes)).unwrap();
        assert_eq!(payload.message_type, "CONTROL_MESSAGE");
    }

    #[test]
    fn test_decode_non_string_messages() {
        let payload = decode_record(&encode(
            br#"{
                "messageType": "DATA_MESSAGE",
                "logEvents": [
                    {"id": "1", "timestamp": 1, "message": 42},
                    {"id": "2", "timestamp": 2, "message": {"level": "ERROR"}},
                    {"id": "3", "timestamp": 3, "message": null}
                ]
            }"#,
        ))
        .unwrap();

        assert_eq!(payload.log_events[0].message, "42");
        assert_eq!(payload.log_events[1].message, r#"{"level":"ERROR"}"#);
        assert_eq!(payload.log_events[2].message, "null");
    }

    #[test]
    fn test_decode_invalid_base64() {
        let res = decode_record("not base64 at all!");
        assert!(matches!(res, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_uncompressed_data() {
        let res = decode_record(&STANDARD.encode(DATA_PAYLOAD));
        assert!(matches!(res, Err(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_decode_truncated_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(DATA_PAYLOAD.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        let res = decode_record(&STANDARD.encode(truncated));
        assert!(matches!(res, Err(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_decode_malformed_json() {
        let res = decode_record(&encode(b"{\"messageType\": "));
        assert!(matches!(res, Err(DecodeError::Json(_))));

        // log line without a message
        let res = decode_record(&encode(
            br#"{"messageType": "DATA_MESSAGE", "logEvents": [{"id": "1"}]}"#,
        ));
        assert!(matches!(res, Err(DecodeError::Json(_))));
    }
}

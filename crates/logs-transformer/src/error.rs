// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types for start-up and for every per-record stage.
//!
//! [`ConfigError`] is fatal for the whole invocation. Everything under
//! [`TransformError`] is scoped to a single record and ends up as a
//! `ProcessingFailed` outcome for that record only.

/// Errors raised while reading configuration at process start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The transport or compression layer of a record could not be reversed.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("corrupt gzip stream: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("malformed subscription payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unknown message type '{0}'")]
    UnknownMessageType(String),
}

/// The timestamp of a log event could not be turned into a date.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("log event has no timestamp")]
    Missing,

    #[error("unparseable timestamp '{0}'")]
    Unparseable(String),

    #[error("timestamp {0}ms is outside the supported date range")]
    OutOfRange(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("encoded record is {size} bytes, limit is {limit} bytes")]
    RecordTooLarge { size: usize, limit: usize },

    #[error("failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure that turns a single record into `ProcessingFailed`.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("extract: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("route: {0}")]
    Routing(#[from] RoutingError),

    #[error("encode: {0}")]
    Encode(#[from] EncodeError),
}

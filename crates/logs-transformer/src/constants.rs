// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Constants shared by the transformation stages.

/// Discriminator of a subscription payload carrying log lines.
pub const DATA_MESSAGE: &str = "DATA_MESSAGE";

/// Discriminator of a reachability check sent by the log subscription. Carries no
/// log lines worth indexing.
pub const CONTROL_MESSAGE: &str = "CONTROL_MESSAGE";

/// Maximum size in bytes of the base64 encoded `data` of a single outgoing record.
///
/// The function response is capped at 6MB (6,291,456 bytes); 6,000,000 leaves headroom
/// for the record ids and the JSON envelope.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 6_000_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const INDEX_PREFIX_ENV: &str = "LOGS_INDEX_PREFIX";
pub const MAX_RECORD_BYTES_ENV: &str = "LOGS_MAX_RECORD_BYTES";
pub const LOG_LEVEL_ENV: &str = "LOGS_LOG_LEVEL";

/// Characters the index store rejects in index names.
pub(crate) const INDEX_NAME_FORBIDDEN_CHARS: &[char] =
    &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ':'];

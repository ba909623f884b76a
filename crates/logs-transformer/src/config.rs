// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_MAX_RECORD_BYTES, INDEX_NAME_FORBIDDEN_CHARS, INDEX_PREFIX_ENV,
    LOG_LEVEL_ENV, MAX_RECORD_BYTES_ENV,
};
use crate::error::ConfigError;

/// Longest index name the index store accepts, in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;
/// Length of the `-YYYY-MM-DD` suffix appended by the router.
const DATE_SUFFIX_BYTES: usize = 11;

/// Configuration for the transformer, read once at process start.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Prefix of every destination index (`<prefix>-YYYY-MM-DD`)
    pub index_prefix: String,
    /// Upper bound on the base64 encoded size of one outgoing record
    pub max_record_bytes: usize,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl TransformerConfig {
    /// Configuration with the given prefix and defaults for everything else.
    pub fn new(index_prefix: impl Into<String>) -> Self {
        Self {
            index_prefix: index_prefix.into(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let index_prefix =
            env::var(INDEX_PREFIX_ENV).map_err(|_| ConfigError::MissingVar(INDEX_PREFIX_ENV))?;
        let max_record_bytes = match env::var(MAX_RECORD_BYTES_ENV) {
            Ok(val) => val.trim().parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{MAX_RECORD_BYTES_ENV} must be a positive integer, got '{val}'"
                ))
            })?,
            Err(_) => DEFAULT_MAX_RECORD_BYTES,
        };
        let log_level = env::var(LOG_LEVEL_ENV)
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            index_prefix,
            max_record_bytes,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_index_prefix(&self.index_prefix)?;

        if self.max_record_bytes == 0 {
            return Err(ConfigError::Invalid(format!(
                "{MAX_RECORD_BYTES_ENV} must be greater than 0"
            )));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// Checks that `<prefix>-YYYY-MM-DD` is a name the index store will accept.
///
/// A valid prefix must:
/// - Not be empty
/// - Be lowercase and free of whitespace
/// - Not contain any of `\ / * ? " < > | , # :`
/// - Not start with `-`, `_` or `+`
/// - Leave room for the date suffix within the 255 byte name limit
pub fn validate_index_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{INDEX_PREFIX_ENV} cannot be empty"
        )));
    }

    if prefix.starts_with(['-', '_', '+']) {
        return Err(ConfigError::Invalid(format!(
            "{INDEX_PREFIX_ENV} cannot start with '-', '_' or '+', got '{prefix}'"
        )));
    }

    if let Some(invalid_char) = prefix.chars().find(|&ch| {
        ch.is_whitespace() || ch.is_uppercase() || INDEX_NAME_FORBIDDEN_CHARS.contains(&ch)
    }) {
        return Err(ConfigError::Invalid(format!(
            "{INDEX_PREFIX_ENV} contains invalid character '{invalid_char}' in '{prefix}'"
        )));
    }

    if prefix.len() + DATE_SUFFIX_BYTES > MAX_INDEX_NAME_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{INDEX_PREFIX_ENV} is too long, index names are limited to {MAX_INDEX_NAME_BYTES} bytes"
        )));
    }

    Ok(())
}

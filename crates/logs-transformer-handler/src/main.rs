// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{process::ExitCode, str::FromStr, sync::Arc};

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use logs_transformer::{
    config::TransformerConfig, error::ConfigError, logger::Formatter,
    transformer::BatchTransformer, wire::TransformationEvent,
};

#[tokio::main]
pub async fn main() -> ExitCode {
    // read before logging is installed so the log level comes from validated config
    let config = TransformerConfig::from_env();

    if let Err(e) = init_logging(log_level(&config)) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    debug!("Logging subsystem enabled");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => abort(&e),
    }
}

/// Level from the configuration, `info` when the configuration is invalid so the
/// start-up error is still reported.
fn log_level(config: &Result<TransformerConfig, ConfigError>) -> LevelFilter {
    config
        .as_ref()
        .ok()
        .and_then(|config| LevelFilter::from_str(&config.log_level).ok())
        .unwrap_or(LevelFilter::INFO)
}

fn init_logging(level: LevelFilter) -> anyhow::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .parse("")
        .context("could not build log filter")?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .event_format(Formatter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn abort(e: &anyhow::Error) -> ExitCode {
    error!("Transformation invocation aborted: {e:#}");
    ExitCode::FAILURE
}

/// Reads one invocation from stdin and writes the response to stdout.
async fn run(config: Result<TransformerConfig, ConfigError>) -> anyhow::Result<()> {
    let config = config.context("invalid configuration")?;
    debug!(index_prefix = %config.index_prefix, "Loaded configuration");

    let mut input = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut input)
        .await
        .context("failed to read invocation from stdin")?;

    let output = handle_invocation(config, &input)?;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&output)
        .await
        .context("failed to write response")?;
    stdout.flush().await.context("failed to flush response")?;
    Ok(())
}

/// Parses one invocation, transforms it and serializes the response.
fn handle_invocation(config: TransformerConfig, input: &[u8]) -> anyhow::Result<Vec<u8>> {
    let event: TransformationEvent =
        serde_json::from_slice(input).context("failed to parse invocation")?;

    let transformer = BatchTransformer::new(Arc::new(config));
    let response = transformer.transform_batch(&event);

    serde_json::to_vec(&response).context("failed to serialize response")
}

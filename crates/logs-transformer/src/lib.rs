// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Transformation step for log subscription records flowing through a streaming
//! delivery channel on their way to a search index.
//!
//! Each invocation carries a batch of raw records. Every record is handled on its own:
//!
//! ```text
//!   RawRecord (base64 + gzip + JSON)
//!         │
//!         v
//!   ┌──────────────┐
//!   │   Decoder    │  (transport encoding, decompression, JSON)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │  Extractor   │  (data vs control message, one LogEvent per line)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │    Router    │  (<prefix>-YYYY-MM-DD at UTC)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Encoder    │  (bulk documents, base64)
//!   └──────┬───────┘
//!          │
//!          v
//!   OutcomeRecord (Ok | Dropped | ProcessingFailed)
//! ```
//!
//! The [`transformer::BatchTransformer`] drives these stages and guarantees exactly one
//! outcome per input record. Failures never cross a record boundary.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod router;
pub mod transformer;
pub mod wire;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for operation bookkeeping

use thiserror::Error;

/// Caller-misuse errors raised synchronously by the operation API.
///
/// None of these are subject to an operation's suppress policy: they surface
/// at the call site that caused them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OplogError {
    #[error("property `{key}` already exists in {scope}")]
    DuplicateProperty { scope: String, key: String },
    #[error("global property `{key}` has unsupported type {kind}; expected string, bool, integer or float")]
    UnsupportedGlobalPropertyType { key: String, kind: &'static str },
    #[error("progress is unavailable for op `{operation}`: no total was given and no progress bar is displayed")]
    ProgressUnavailable { operation: String },
    #[error("op `{operation}` already has a progress indicator or spinner attached")]
    AlreadyDisplaying { operation: String },
    #[error("op `{operation}` is not started")]
    NotStarted { operation: String },
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = OplogError> = std::result::Result<T, E>;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier sources for operations and correlation trees
//!
//! Operation ids name one node; correlation ids are minted once per root and
//! copied down the tree. The two kinds are drawn separately so they never
//! collide and a test can predict each independently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub trait IdGen: Send + Sync {
    /// Id for a newly built operation
    fn operation_id(&self) -> String;

    /// Id for a new operation tree, minted when a root starts
    fn correlation_id(&self) -> String;
}

/// Random v4 UUIDs for both kinds
#[derive(Clone, Copy, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn operation_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn correlation_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Counting ids for tests: `op-1`, `op-2`, ... and `corr-1`, `corr-2`, ...
///
/// Clones share both counters.
#[derive(Clone)]
pub struct SequentialIdGen {
    operation_prefix: Arc<str>,
    correlation_prefix: Arc<str>,
    operations: Arc<AtomicU64>,
    correlations: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::with_prefixes("op", "corr")
    }

    pub fn with_prefixes(operation: &str, correlation: &str) -> Self {
        Self {
            operation_prefix: operation.into(),
            correlation_prefix: correlation.into(),
            operations: Arc::new(AtomicU64::new(1)),
            correlations: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(prefix: &str, counter: &AtomicU64) -> String {
    format!("{}-{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

impl IdGen for SequentialIdGen {
    fn operation_id(&self) -> String {
        bump(&self.operation_prefix, &self.operations)
    }

    fn correlation_id(&self) -> String {
        bump(&self.correlation_prefix, &self.correlations)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

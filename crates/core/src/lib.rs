// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! oplog-core: structured operation logging
//!
//! This crate provides:
//! - Nested, timed operations with parent/child and correlation tracking
//! - Per-operation and process-wide property bags
//! - One structured record per finished operation, delivered to a sink
//! - Optional progress bars and spinners drawn on the terminal
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod failure;
pub mod id;
pub mod props;
pub mod record;
pub mod sink;
pub mod stack;

// Lifecycle (depends on everything above)
pub mod operation;
pub mod oplog;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{OplogConfig, SpinnerConfig};
pub use display::{DisplayRequest, Terminal};
pub use error::{OplogError, Result};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use operation::{Operation, OperationBuilder, OperationGuard, OperationState};
pub use oplog::{Oplog, OplogBuilder};
pub use props::{GlobalProps, PropValue, PropertyBag};
pub use record::{OperationRecord, OperationResult, OperationStep};
pub use sink::{
    json_serializer, ChannelSink, FanoutSink, MemorySink, OperationSink, RecordReceiver,
    Serializer, TracingSink,
};

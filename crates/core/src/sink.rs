// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Emission sinks for finished operation records
//!
//! A sink receives one record per finished operation (and one per started
//! operation when on-start logging is enabled). Sinks must return promptly:
//! they run during operation finalization.

use crate::record::{OperationRecord, OperationResult, OperationStep};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Receives structured operation records
pub trait OperationSink: Send + Sync {
    fn emit(&self, record: &OperationRecord);
}

/// Renders a record into the display string carried by log events
pub type Serializer = fn(&OperationRecord) -> String;

/// Compact JSON rendering; the default [`Serializer`]
pub fn json_serializer(record: &OperationRecord) -> String {
    serde_json::to_string(record).unwrap_or_else(|e| format!("{:?} (unserializable: {})", record, e))
}

/// Sink that logs each record as a `tracing` event
///
/// Success and start records log at INFO, failures at ERROR.
#[derive(Clone)]
pub struct TracingSink {
    logger: String,
    serializer: Serializer,
}

impl TracingSink {
    pub fn new(logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            serializer: json_serializer,
        }
    }

    pub fn with_serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("oplog")
    }
}

impl OperationSink for TracingSink {
    fn emit(&self, record: &OperationRecord) {
        let rendered = (self.serializer)(record);
        let logger = self.logger.as_str();
        let operation = record.name.as_str();
        let id = record.id.as_str();
        let correlation_id = record.correlation_id.as_str();
        let parent_id = record.parent_id.as_deref();

        match (record.step, record.result) {
            (OperationStep::Start, _) => tracing::info!(
                logger,
                operation,
                id,
                parent_id,
                correlation_id,
                record = %rendered,
                "operation started"
            ),
            (OperationStep::End, OperationResult::Failure) => tracing::error!(
                logger,
                operation,
                id,
                parent_id,
                correlation_id,
                result = %record.result,
                duration_ms = record.duration_ms,
                exception_type = record.exception_type.as_deref(),
                exception_message = record.exception_message.as_deref(),
                record = %rendered,
                "operation failed"
            ),
            (OperationStep::End, _) => tracing::info!(
                logger,
                operation,
                id,
                parent_id,
                correlation_id,
                result = %record.result,
                duration_ms = record.duration_ms,
                record = %rendered,
                "operation succeeded"
            ),
        }
    }
}

/// Sink that keeps every record in memory
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<OperationRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in emission order
    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Records produced at operation exit
    pub fn finished(&self) -> Vec<OperationRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.step == OperationStep::End)
            .collect()
    }

    /// First finished record with the given name
    pub fn find(&self, name: &str) -> Option<OperationRecord> {
        self.finished().into_iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl OperationSink for MemorySink {
    fn emit(&self, record: &OperationRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
    }
}

/// Receiver side of a [`ChannelSink`]
pub type RecordReceiver = mpsc::UnboundedReceiver<OperationRecord>;

/// Sink that forwards records into an unbounded channel without blocking
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OperationRecord>,
}

impl ChannelSink {
    pub fn new() -> (Self, RecordReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OperationSink for ChannelSink {
    fn emit(&self, record: &OperationRecord) {
        if self.tx.send(record.clone()).is_err() {
            tracing::debug!(operation = %record.name, "record receiver closed, dropping record");
        }
    }
}

/// Sink that emits to several sinks in order
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn OperationSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl OperationSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }
}

impl OperationSink for FanoutSink {
    fn emit(&self, record: &OperationRecord) {
        for sink in &self.sinks {
            sink.emit(record);
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;

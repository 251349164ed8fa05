// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared context every operation is created from

use crate::clock::{Clock, SystemClock};
use crate::config::OplogConfig;
use crate::display::Terminal;
use crate::id::{IdGen, UuidIdGen};
use crate::operation::{Operation, OperationBuilder};
use crate::props::GlobalProps;
use crate::record::OperationRecord;
use crate::sink::{OperationSink, TracingSink};
use std::fmt;
use std::sync::Arc;

struct OplogInner {
    sink: Arc<dyn OperationSink>,
    globals: GlobalProps,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGen>,
    terminal: Terminal,
    config: OplogConfig,
}

/// Entry point for creating operations
///
/// Cheap to clone. Holds the sink, the global property registry, the clock
/// and id source, the terminal and the configuration.
#[derive(Clone)]
pub struct Oplog {
    inner: Arc<OplogInner>,
}

impl Oplog {
    pub fn builder() -> OplogBuilder {
        OplogBuilder::default()
    }

    /// Start configuring a new operation
    pub fn operation(&self, name: impl Into<String>) -> OperationBuilder {
        OperationBuilder::new(self.clone(), name.into())
    }

    pub fn globals(&self) -> &GlobalProps {
        &self.inner.globals
    }

    pub fn config(&self) -> &OplogConfig {
        &self.inner.config
    }

    pub fn terminal(&self) -> &Terminal {
        &self.inner.terminal
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    pub(crate) fn ids(&self) -> &dyn IdGen {
        self.inner.ids.as_ref()
    }

    pub(crate) fn emit(&self, record: &OperationRecord) {
        self.inner.sink.emit(record);
    }

    /// Wrap `f` so every call runs as an operation named `name`
    pub fn wrap<A, T, E, F>(
        &self,
        name: impl Into<String>,
        suppress: bool,
        f: F,
    ) -> impl Fn(A) -> Result<Option<T>, E>
    where
        F: Fn(&Operation, A) -> Result<T, E>,
        E: std::error::Error,
    {
        let oplog = self.clone();
        let name = name.into();
        move |arg| {
            oplog
                .operation(name.clone())
                .suppress(suppress)
                .run(|op| f(op, arg))
        }
    }

    /// Like [`Oplog::wrap`], naming each call from its argument
    pub fn wrap_named<A, T, E, N, F>(
        &self,
        name_fn: N,
        suppress: bool,
        f: F,
    ) -> impl Fn(A) -> Result<Option<T>, E>
    where
        N: Fn(&A) -> String,
        F: Fn(&Operation, A) -> Result<T, E>,
        E: std::error::Error,
    {
        let oplog = self.clone();
        move |arg| {
            let name = name_fn(&arg);
            oplog.operation(name).suppress(suppress).run(|op| f(op, arg))
        }
    }
}

impl Default for Oplog {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Oplog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oplog")
            .field("config", &self.inner.config)
            .field("globals", &self.inner.globals.snapshot())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Oplog`]
#[derive(Default)]
pub struct OplogBuilder {
    sink: Option<Arc<dyn OperationSink>>,
    globals: Option<GlobalProps>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGen>>,
    terminal: Option<Terminal>,
    config: OplogConfig,
}

impl OplogBuilder {
    pub fn sink(self, sink: impl OperationSink + 'static) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    pub fn shared_sink(mut self, sink: Arc<dyn OperationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Share a global registry with other contexts
    pub fn globals(mut self, globals: GlobalProps) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_gen(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn config(mut self, config: OplogConfig) -> Self {
        self.config = config;
        self
    }

    /// Defaults: a [`TracingSink`] named by the config's logger, the system
    /// clock, UUID ids and stderr
    pub fn build(self) -> Oplog {
        let config = self.config;
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new(config.logger.clone())));
        Oplog {
            inner: Arc::new(OplogInner {
                sink,
                globals: self.globals.unwrap_or_default(),
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                ids: self.ids.unwrap_or_else(|| Arc::new(UuidIdGen)),
                terminal: self.terminal.unwrap_or_else(Terminal::stderr),
                config,
            }),
        }
    }
}

#[cfg(test)]
#[path = "oplog_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped, timed units of work
//!
//! An operation moves `Created -> Started -> Ended`. Entering resolves the
//! parent from the context-local stack, copies or mints the correlation id,
//! pushes itself and attaches any requested display. Exiting always stops
//! timing, classifies the result, pops, tears down the display and emits a
//! record, whether the body succeeded, failed or panicked. Suppression only
//! decides whether a failure reaches the caller afterwards.

use crate::display::{
    self, AncestorDisplay, Display, DisplayRequest, ProgressIndicator, SpinnerAnimation,
};
use crate::error::{OplogError, Result};
use crate::failure::{self, Failure};
use crate::oplog::Oplog;
use crate::props::{PropValue, PropertyBag};
use crate::record::{OperationRecord, OperationResult, OperationStep};
use crate::stack;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

/// Lifecycle state of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Created,
    Started,
    Ended,
}

struct Data {
    state: OperationState,
    parent: Weak<Inner>,
    parent_id: Option<String>,
    children: Vec<Operation>,
    correlation_id: Option<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    started_at: Option<Instant>,
    duration: Option<Duration>,
    result: OperationResult,
    exception_type: Option<String>,
    exception_message: Option<String>,
    traceback: Option<Vec<String>>,
    custom_props: PropertyBag,
    display_request: Option<DisplayRequest>,
    display: Option<Display>,
    completion_ratio: Option<f64>,
    thread_name: Option<String>,
}

struct Inner {
    id: String,
    name: String,
    suppress: bool,
    oplog: Oplog,
    data: Mutex<Data>,
}

/// Handle to one node of an operation tree
///
/// Clones refer to the same operation. Children are owned by their parent;
/// the parent link is weak.
#[derive(Clone)]
pub struct Operation {
    inner: Arc<Inner>,
}

impl Operation {
    pub(crate) fn new(
        oplog: Oplog,
        name: String,
        suppress: bool,
        display_request: Option<DisplayRequest>,
    ) -> Self {
        let id = oplog.ids().operation_id();
        Self {
            inner: Arc::new(Inner {
                id,
                name,
                suppress,
                oplog,
                data: Mutex::new(Data {
                    state: OperationState::Created,
                    parent: Weak::new(),
                    parent_id: None,
                    children: Vec::new(),
                    correlation_id: None,
                    start_time: None,
                    end_time: None,
                    started_at: None,
                    duration: None,
                    result: OperationResult::Pending,
                    exception_type: None,
                    exception_message: None,
                    traceback: None,
                    custom_props: PropertyBag::new(),
                    display_request,
                    display: None,
                    completion_ratio: None,
                    thread_name: None,
                }),
            }),
        }
    }

    fn data(&self) -> MutexGuard<'_, Data> {
        self.inner.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn suppress(&self) -> bool {
        self.inner.suppress
    }

    pub fn state(&self) -> OperationState {
        self.data().state
    }

    /// Shared by every node of the tree; `None` until started
    pub fn correlation_id(&self) -> Option<String> {
        self.data().correlation_id.clone()
    }

    pub fn parent_id(&self) -> Option<String> {
        self.data().parent_id.clone()
    }

    pub fn parent(&self) -> Option<Operation> {
        self.data()
            .parent
            .upgrade()
            .map(|inner| Operation { inner })
    }

    /// Children in the order they started
    pub fn children(&self) -> Vec<Operation> {
        self.data().children.clone()
    }

    pub fn result(&self) -> OperationResult {
        self.data().result
    }

    pub fn duration(&self) -> Option<Duration> {
        self.data().duration
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.data().start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.data().end_time
    }

    pub fn exception_type(&self) -> Option<String> {
        self.data().exception_type.clone()
    }

    pub fn exception_message(&self) -> Option<String> {
        self.data().exception_message.clone()
    }

    /// Error message and its causes, or the panic location; set on failure
    pub fn traceback(&self) -> Option<Vec<String>> {
        self.data().traceback.clone()
    }

    pub fn custom_props(&self) -> PropertyBag {
        self.data().custom_props.clone()
    }

    /// Progress ratio in `[0, 1]`; `None` without a progress indicator or
    /// after a failure with no known total
    pub fn completion_ratio(&self) -> Option<f64> {
        let data = self.data();
        match &data.display {
            Some(Display::Progress(progress)) => progress.completion_ratio(),
            _ => data.completion_ratio,
        }
    }

    /// True while a progress indicator or spinner is attached
    pub fn is_displaying(&self) -> bool {
        self.data().display.is_some()
    }

    fn ensure_started(&self, data: &Data) -> Result<()> {
        if data.state == OperationState::Started {
            Ok(())
        } else {
            Err(OplogError::NotStarted {
                operation: self.inner.name.clone(),
            })
        }
    }

    /// Attach a custom property; keys are insert-once
    pub fn add(&self, key: impl Into<String>, value: impl Into<PropValue>) -> Result<()> {
        let mut data = self.data();
        self.ensure_started(&data)?;
        let scope = format!("op `{}`", self.inner.name);
        data.custom_props.insert_in(&scope, key.into(), value.into())
    }

    /// Attach a nested bag under a single key
    pub fn add_bag(&self, key: impl Into<String>, bag: PropertyBag) -> Result<()> {
        self.add(key, PropValue::Bag(bag))
    }

    /// Attach several properties, stopping at the first duplicate
    pub fn add_multi<K, V, I>(&self, pairs: I) -> Result<()>
    where
        K: Into<String>,
        V: Into<PropValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.add(key, value)?;
        }
        Ok(())
    }

    /// Report `n` completed steps to the attached progress indicator
    pub fn progress(&self, n: u64) -> Result<()> {
        let mut data = self.data();
        self.ensure_started(&data)?;
        match &mut data.display {
            Some(Display::Progress(progress)) => progress.progress(n),
            _ => Err(OplogError::ProgressUnavailable {
                operation: self.inner.name.clone(),
            }),
        }
    }

    /// Snapshot as an emission record; `None` before the operation starts
    pub fn record(&self) -> Option<OperationRecord> {
        let data = self.data();
        let start_time = data.start_time?;
        let step = match data.state {
            OperationState::Ended => OperationStep::End,
            _ => OperationStep::Start,
        };
        let completion_ratio = match &data.display {
            Some(Display::Progress(progress)) => progress.completion_ratio(),
            _ => data.completion_ratio,
        };
        Some(OperationRecord {
            step,
            name: self.inner.name.clone(),
            id: self.inner.id.clone(),
            parent_id: data.parent_id.clone(),
            correlation_id: data.correlation_id.clone().unwrap_or_default(),
            start_time,
            end_time: data.end_time,
            duration: data.duration,
            duration_ms: data.duration.map(rounded_millis),
            result: data.result,
            exception_type: data.exception_type.clone(),
            exception_message: data.exception_message.clone(),
            traceback: data.traceback.clone(),
            custom_props: data.custom_props.clone(),
            global_props: self.inner.oplog.globals().snapshot(),
            completion_ratio,
            suppress: self.inner.suppress,
            logger: self.inner.oplog.config().logger.clone(),
            process_id: std::process::id(),
            thread_name: data.thread_name.clone(),
        })
    }

    fn ancestor_display(&self) -> Option<AncestorDisplay> {
        self.data().display.as_ref().map(Display::as_ancestor)
    }

    fn adopt(&self, child: &Operation) {
        self.data().children.push(child.clone());
    }

    /// `Created -> Started`
    pub(crate) fn enter(&self) {
        let oplog = self.inner.oplog.clone();
        if self.state() != OperationState::Created {
            tracing::warn!(operation = self.name(), id = self.id(), "operation entered twice");
            return;
        }

        let start_time = oplog.clock().utc_now();
        let started_at = oplog.clock().now();

        let ancestors = stack::snapshot();
        let parent = ancestors.last().cloned();
        // one-time copy from the immediate parent, which already holds the
        // tree's resolved id
        let inherited = parent.as_ref().and_then(|parent| {
            parent.adopt(self);
            parent.correlation_id()
        });
        let correlation_id = inherited.unwrap_or_else(|| oplog.ids().correlation_id());

        {
            let mut data = self.data();
            data.start_time = Some(start_time);
            data.started_at = Some(started_at);
            data.parent = parent
                .as_ref()
                .map(|p| Arc::downgrade(&p.inner))
                .unwrap_or_default();
            data.parent_id = parent.as_ref().map(|p| p.id().to_string());
            data.correlation_id = Some(correlation_id);
            data.thread_name = std::thread::current().name().map(str::to_string);
            data.state = OperationState::Started;
        }
        stack::push(self.clone());

        let ancestor_displays: Vec<AncestorDisplay> = ancestors
            .iter()
            .filter_map(Operation::ancestor_display)
            .collect();
        self.attach_display(&ancestor_displays);

        tracing::trace!(
            operation = self.name(),
            id = self.id(),
            depth = ancestors.len(),
            "operation started"
        );

        if oplog.config().log_on_start {
            if let Some(record) = self.record() {
                oplog.emit(&record);
            }
        }
    }

    fn attach_display(&self, ancestors: &[AncestorDisplay]) {
        let Some(request) = self.data().display_request.clone() else {
            return;
        };
        let oplog = &self.inner.oplog;
        let config = oplog.config();
        let layout = display::layout(ancestors);

        let attached = match request {
            DisplayRequest::Progress { total } => Display::Progress(ProgressIndicator::new(
                self.name(),
                total,
                config.show_progress_bar(),
                layout.nesting_level,
                layout.group,
                oplog.terminal(),
            )),
            DisplayRequest::Spinner { frames, interval } => {
                let (default_frames, default_interval) = config.spinner.cycle();
                let frames = frames
                    .filter(|f| !f.is_empty())
                    .unwrap_or(default_frames);
                let mut spinner = SpinnerAnimation::new(
                    oplog.terminal().clone(),
                    self.name(),
                    &frames,
                    interval.unwrap_or(default_interval),
                    layout.nesting_level,
                    layout.cursor_offset,
                    layout.parent_spinner,
                );
                if !config.render {
                    spinner = spinner.disable();
                }
                spinner.start();
                Display::Spinner(spinner)
            }
        };
        self.data().display = Some(attached);
    }

    /// `Started -> Ended`
    pub(crate) fn exit(&self, failure: Option<Failure>) {
        let oplog = self.inner.oplog.clone();
        let success = failure.is_none();

        let attached = {
            let mut data = self.data();
            if data.state != OperationState::Started {
                return;
            }
            let ended_at = oplog.clock().now();
            data.end_time = Some(oplog.clock().utc_now());
            data.duration = data
                .started_at
                .map(|start| ended_at.saturating_duration_since(start));
            match failure {
                None => data.result = OperationResult::Success,
                Some(failure) => {
                    data.result = OperationResult::Failure;
                    data.exception_type = Some(failure.exception_type);
                    data.exception_message = Some(failure.message);
                    data.traceback = Some(failure.traceback);
                }
            }
            data.state = OperationState::Ended;
            data.display.take()
        };

        stack::pop(self);

        match attached {
            Some(Display::Progress(mut progress)) => {
                progress.finish(success);
                self.data().completion_ratio = progress.completion_ratio();
            }
            Some(Display::Spinner(mut spinner)) => spinner.terminate(),
            None => {}
        }

        if let Some(record) = self.record() {
            tracing::trace!(
                operation = self.name(),
                id = self.id(),
                result = %record.result,
                "operation ended"
            );
            oplog.emit(&record);
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Operation {}

fn rounded_millis(duration: Duration) -> u64 {
    u64::try_from((duration.as_micros() + 500) / 1000).unwrap_or(u64::MAX)
}

/// A started operation; finalizes on [`OperationGuard::end`] or on drop
///
/// Dropping without an explicit end counts as success, or as a `panic`
/// failure while unwinding.
#[must_use = "dropping the guard ends the operation immediately"]
pub struct OperationGuard {
    op: Operation,
    finished: bool,
}

impl OperationGuard {
    fn enter(op: Operation) -> Self {
        failure::install_panic_hook();
        op.enter();
        Self {
            op,
            finished: false,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.op
    }

    pub fn succeed(mut self) {
        self.finished = true;
        self.op.exit(None);
    }

    pub fn fail<E: Error + ?Sized>(mut self, error: &E) {
        self.finished = true;
        self.op.exit(Some(Failure::from_error(error)));
    }

    /// Finalize from the body's outcome
    pub fn end<T, E: Error>(self, outcome: &std::result::Result<T, E>) {
        match outcome {
            Ok(_) => self.succeed(),
            Err(error) => self.fail(error),
        }
    }

    fn fail_panic(mut self, payload: &(dyn Any + Send)) {
        self.finished = true;
        self.op.exit(Some(Failure::from_panic(Some(payload))));
    }
}

impl Deref for OperationGuard {
    type Target = Operation;

    fn deref(&self) -> &Operation {
        &self.op
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let failure = std::thread::panicking().then(|| Failure::from_panic(None));
        self.op.exit(failure);
    }
}

/// Configures an operation before it starts
#[must_use]
pub struct OperationBuilder {
    oplog: Oplog,
    name: String,
    suppress: bool,
    display: Option<DisplayRequest>,
}

impl OperationBuilder {
    pub(crate) fn new(oplog: Oplog, name: String) -> Self {
        Self {
            oplog,
            name,
            suppress: false,
            display: None,
        }
    }

    /// Swallow a failing body's error after finalization
    pub fn suppress(mut self, suppress: bool) -> Self {
        self.suppress = suppress;
        self
    }

    /// Track progress against an optional total, drawing a bar when enabled
    pub fn progressable(self, total: Option<u64>) -> Result<Self> {
        self.with_display(DisplayRequest::Progress { total })
    }

    /// Show a spinner using the configured frame cycle
    pub fn spinnable(self) -> Result<Self> {
        self.with_display(DisplayRequest::Spinner {
            frames: None,
            interval: None,
        })
    }

    /// Show a spinner with explicit frames and interval
    pub fn spinnable_with(self, frames: Vec<String>, interval: Duration) -> Result<Self> {
        self.with_display(DisplayRequest::Spinner {
            frames: Some(frames),
            interval: Some(interval),
        })
    }

    fn with_display(mut self, request: DisplayRequest) -> Result<Self> {
        if self.display.is_some() {
            return Err(OplogError::AlreadyDisplaying {
                operation: self.name,
            });
        }
        self.display = Some(request);
        Ok(self)
    }

    /// The operation in `Created` state, not yet entered
    pub fn build(self) -> Operation {
        Operation::new(self.oplog, self.name, self.suppress, self.display)
    }

    /// Enter the operation and return its scope guard
    pub fn start(self) -> OperationGuard {
        OperationGuard::enter(self.build())
    }

    /// Run a synchronous body inside the operation
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` when a failure was
    /// suppressed, and `Err(error)` when it propagates. A panicking body is
    /// finalized as a failure and the panic continues.
    pub fn run<T, E, F>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(&Operation) -> std::result::Result<T, E>,
        E: Error,
    {
        let suppress = self.suppress;
        let guard = self.start();
        let op = guard.operation().clone();
        match std::panic::catch_unwind(AssertUnwindSafe(|| f(&op))) {
            Ok(outcome) => conclude(guard, outcome, suppress),
            Err(payload) => {
                guard.fail_panic(payload.as_ref());
                std::panic::resume_unwind(payload)
            }
        }
    }

    /// Run an async body inside the operation
    ///
    /// Outside any operation-aware task scope, a new scope is opened for the
    /// body, seeded with the calling thread's open operations.
    pub async fn run_async<T, E, F, Fut>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(Operation) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Error,
    {
        if stack::in_task_scope() {
            self.run_scoped(f).await
        } else {
            stack::inherit(self.run_scoped(f)).await
        }
    }

    async fn run_scoped<T, E, F, Fut>(self, f: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(Operation) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Error,
    {
        let suppress = self.suppress;
        let guard = self.start();
        let outcome = f(guard.operation().clone()).await;
        conclude(guard, outcome, suppress)
    }
}

fn conclude<T, E: Error>(
    guard: OperationGuard,
    outcome: std::result::Result<T, E>,
    suppress: bool,
) -> std::result::Result<Option<T>, E> {
    match outcome {
        Ok(value) => {
            guard.succeed();
            Ok(Some(value))
        }
        Err(error) => {
            guard.fail(&error);
            if suppress {
                Ok(None)
            } else {
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;

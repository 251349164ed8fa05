// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context-local stack of open operations
//!
//! Each logical call chain sees its own stack. Inside a tokio task scope
//! opened by [`scope`] (or by an async operation) the stack is task-local and
//! follows the task across worker threads. Plain synchronous code uses a
//! per-thread stack. Spawned tasks never inherit a parent's stack.

use crate::operation::Operation;
use std::cell::RefCell;
use std::future::Future;

tokio::task_local! {
    static TASK_STACK: RefCell<Vec<Operation>>;
}

thread_local! {
    static THREAD_STACK: RefCell<Vec<Operation>> = const { RefCell::new(Vec::new()) };
}

/// True when running inside a task-local stack scope
pub fn in_task_scope() -> bool {
    TASK_STACK.try_with(|_| ()).is_ok()
}

fn with_stack<R>(f: impl FnOnce(&RefCell<Vec<Operation>>) -> R) -> R {
    if in_task_scope() {
        TASK_STACK.with(f)
    } else {
        THREAD_STACK.with(f)
    }
}

/// Most recently entered, not yet exited operation
pub fn current() -> Option<Operation> {
    with_stack(|stack| stack.borrow().last().cloned())
}

/// Number of open operations in this call chain
pub fn depth() -> usize {
    with_stack(|stack| stack.borrow().len())
}

/// Open operations, root first
pub fn snapshot() -> Vec<Operation> {
    with_stack(|stack| stack.borrow().clone())
}

pub(crate) fn push(op: Operation) {
    with_stack(|stack| stack.borrow_mut().push(op));
}

/// Pop `op`, which must be on top. An out-of-order exit is logged and the
/// operation is removed from wherever it sits.
pub(crate) fn pop(op: &Operation) -> bool {
    with_stack(|stack| {
        let mut stack = stack.borrow_mut();
        match stack.iter().rposition(|open| open.id() == op.id()) {
            Some(pos) if pos + 1 == stack.len() => {
                stack.pop();
                true
            }
            Some(pos) => {
                tracing::warn!(
                    operation = op.name(),
                    id = op.id(),
                    depth = stack.len(),
                    position = pos,
                    "operation exited out of order"
                );
                stack.remove(pos);
                true
            }
            None => {
                tracing::warn!(operation = op.name(), id = op.id(), "operation not on stack");
                false
            }
        }
    })
}

/// Run `fut` as an independent call chain with an empty stack
pub async fn scope<F: Future>(fut: F) -> F::Output {
    TASK_STACK.scope(RefCell::new(Vec::new()), fut).await
}

/// Run `fut` in a task scope seeded with the calling thread's open operations
pub(crate) async fn inherit<F: Future>(fut: F) -> F::Output {
    let seed = THREAD_STACK.with(|stack| stack.borrow().clone());
    TASK_STACK.scope(RefCell::new(seed), fut).await
}

#[cfg(test)]
#[path = "stack_tests.rs"]
mod tests;

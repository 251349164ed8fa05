// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of a failed operation body
//!
//! An error body yields its short type name, its message and a traceback
//! built from its `source()` chain. A panic yields `"panic"`, the payload
//! message and the panic location, captured by a process-wide hook that
//! chains to whatever hook was installed before.

use crate::record::short_type_name;
use std::any::Any;
use std::cell::RefCell;
use std::error::Error;
use std::sync::Once;

/// Most entries kept in a record's traceback
pub const TRACEBACK_LIMIT: usize = 10;

thread_local! {
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Failure {
    pub exception_type: String,
    pub message: String,
    pub traceback: Vec<String>,
}

impl Failure {
    pub(crate) fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        Self {
            exception_type: short_type_name::<E>().to_string(),
            message: error.to_string(),
            traceback: cause_chain(error),
        }
    }

    pub(crate) fn from_panic(payload: Option<&(dyn Any + Send)>) -> Self {
        let message = payload
            .and_then(|p| {
                p.downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| p.downcast_ref::<String>().cloned())
            })
            .unwrap_or_else(|| "operation panicked".to_string());
        Self {
            exception_type: "panic".to_string(),
            message,
            traceback: take_panic_location().into_iter().collect(),
        }
    }
}

/// The error's message followed by each `source()`, outermost first
pub fn cause_chain<E: Error + ?Sized>(error: &E) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut next = error.source();
    while let Some(cause) = next {
        if chain.len() == TRACEBACK_LIMIT {
            break;
        }
        chain.push(cause.to_string());
        next = cause.source();
    }
    chain
}

/// Record the location of every panic on the panicking thread
pub(crate) fn install_panic_hook() {
    static HOOK: Once = Once::new();
    if std::thread::panicking() {
        return;
    }
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                let _ = PANIC_LOCATION.try_with(|slot| {
                    *slot.borrow_mut() = Some(location.to_string());
                });
            }
            previous(info);
        }));
    });
}

fn take_panic_location() -> Option<String> {
    PANIC_LOCATION
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The structured record handed to an emission sink

use crate::props::PropertyBag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome of an operation; `Pending` only between entry and exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    Pending,
    Success,
    Failure,
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationResult::Pending => write!(f, "Pending"),
            OperationResult::Success => write!(f, "Success"),
            OperationResult::Failure => write!(f, "Failure"),
        }
    }
}

/// Which lifecycle edge produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStep {
    Start,
    End,
}

/// Snapshot of an operation at a lifecycle edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub step: OperationStep,
    pub name: String,
    pub id: String,
    pub parent_id: Option<String>,
    pub correlation_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    pub duration_ms: Option<u64>,
    pub result: OperationResult,
    pub exception_type: Option<String>,
    pub exception_message: Option<String>,
    /// Error then causes, outermost first; or the panic location
    pub traceback: Option<Vec<String>>,
    pub custom_props: PropertyBag,
    pub global_props: PropertyBag,
    pub completion_ratio: Option<f64>,
    pub suppress: bool,
    pub logger: String,
    pub process_id: u32,
    pub thread_name: Option<String>,
}

impl OperationRecord {
    pub fn is_success(&self) -> bool {
        self.result == OperationResult::Success
    }

    /// Start time in the `2023-06-22 06:27:53.922633` layout
    pub fn start_time_display(&self) -> String {
        self.start_time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start_time_display())?;
        match self.step {
            OperationStep::End => {
                if let Some(ms) = self.duration_ms {
                    write!(f, " ({}ms)", ms)?;
                }
                write!(f, ": [{} / {}]", self.name, self.result)?;
            }
            OperationStep::Start => write!(f, ": [{} / started]", self.name)?,
        }
        if let Some(exception_type) = &self.exception_type {
            write!(
                f,
                " {}: {}",
                exception_type,
                self.exception_message.as_deref().unwrap_or_default()
            )?;
        }
        if !self.custom_props.is_empty() {
            write!(f, " {}", self.custom_props)?;
        }
        if !self.global_props.is_empty() {
            write!(f, " {}", self.global_props)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl OperationRecord {
    /// Finished record with fixed timestamps for assertions
    pub(crate) fn sample(name: &str, result: OperationResult) -> Self {
        use chrono::TimeZone;
        let start_time = Utc
            .with_ymd_and_hms(2023, 6, 22, 6, 27, 53)
            .single()
            .unwrap_or_default();
        Self {
            step: OperationStep::End,
            name: name.to_string(),
            id: "op-1".to_string(),
            parent_id: None,
            correlation_id: "corr-1".to_string(),
            start_time,
            end_time: Some(start_time + chrono::Duration::seconds(1)),
            duration: Some(Duration::from_millis(1000)),
            duration_ms: Some(1000),
            result,
            exception_type: None,
            exception_message: None,
            traceback: None,
            custom_props: PropertyBag::new(),
            global_props: PropertyBag::new(),
            completion_ratio: None,
            suppress: false,
            logger: "oplog".to_string(),
            process_id: 1,
            thread_name: None,
        }
    }
}

/// Short name of an error type, used as a record's `exception_type`
///
/// `my_crate::errors::ValueError` becomes `ValueError`, and
/// `Wrapper<inner::Thing>` becomes `Wrapper`.
pub fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded and unbounded progress tracking with optional nested bars

use super::terminal::Terminal;
use crate::error::{OplogError, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const PROGRESS_INDENT: &str = "--";

const BOUNDED_TEMPLATE: &str = "{msg}: {percent:>3}%|{wide_bar}| {pos}/{len} [{elapsed_precise}]";
const UNBOUNDED_TEMPLATE: &str = "{msg}: {pos} [{elapsed_precise}]";

/// Description prefixed with one indent unit per rendering ancestor
pub fn indented_description(desc: &str, nesting_level: usize) -> String {
    format!(
        "{}{}{}",
        PROGRESS_INDENT.repeat(nesting_level),
        " ".repeat(nesting_level),
        desc
    )
}

/// Tracks completed steps against an optional total
pub struct ProgressIndicator {
    name: String,
    total: Option<u64>,
    completed: u64,
    completion_ratio: Option<f64>,
    nesting_level: usize,
    bar: Option<ProgressBar>,
    multi: Option<MultiProgress>,
}

impl ProgressIndicator {
    /// Create an indicator, drawing a bar only when `show_bar` is set and the
    /// terminal is interactive. Nested bars join the nearest rendering
    /// ancestor's bar group so each keeps its own line.
    pub fn new(
        name: &str,
        total: Option<u64>,
        show_bar: bool,
        nesting_level: usize,
        group: Option<MultiProgress>,
        terminal: &Terminal,
    ) -> Self {
        let (bar, multi) = if show_bar && terminal.is_interactive() {
            let multi = group.unwrap_or_else(|| {
                MultiProgress::with_draw_target(ProgressDrawTarget::term_like(Box::new(
                    terminal.clone(),
                )))
            });
            let bar = multi.add(match total {
                Some(total) => ProgressBar::new(total),
                None => ProgressBar::new_spinner(),
            });
            let template = if total.is_some() {
                BOUNDED_TEMPLATE
            } else {
                UNBOUNDED_TEMPLATE
            };
            let style = ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar.set_message(indented_description(name, nesting_level));
            (Some(bar), Some(multi))
        } else {
            (None, None)
        };

        Self {
            name: name.to_string(),
            total,
            completed: 0,
            completion_ratio: Some(0.0),
            nesting_level,
            bar,
            multi,
        }
    }

    /// Record `n` more completed steps
    pub fn progress(&mut self, n: u64) -> Result<()> {
        if self.bar.is_none() && self.total.is_none() {
            return Err(OplogError::ProgressUnavailable {
                operation: self.name.clone(),
            });
        }

        self.completed = self.completed.saturating_add(n);
        if let Some(bar) = &self.bar {
            bar.inc(n);
        }
        if let Some(total) = self.total.filter(|t| *t > 0) {
            self.completion_ratio = Some((self.completed as f64 / total as f64).min(1.0));
        }
        Ok(())
    }

    /// Tear down the indicator at operation exit
    ///
    /// On success a known total is force-filled and the ratio becomes 1.0.
    /// On failure the last observed state is kept; with no known total the
    /// ratio becomes undefined.
    pub fn finish(&mut self, success: bool) {
        if success {
            if let Some(total) = self.total {
                self.completed = self.completed.max(total);
            }
            self.completion_ratio = Some(1.0);
        } else if self.total.is_none() {
            self.completion_ratio = None;
        }

        let Some(bar) = self.bar.take() else {
            return;
        };
        if success {
            if let Some(total) = self.total {
                bar.set_position(total);
            }
        }
        // only root-level bars stay on screen
        if self.nesting_level == 0 {
            if success {
                bar.finish();
            } else {
                bar.abandon();
            }
        } else {
            bar.finish_and_clear();
            if let Some(multi) = &self.multi {
                multi.remove(&bar);
            }
        }
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn completion_ratio(&self) -> Option<f64> {
        self.completion_ratio
    }

    pub fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    pub fn is_rendering(&self) -> bool {
        self.bar.is_some()
    }

    /// Bar group shared with nested indicators
    pub(crate) fn group(&self) -> Option<MultiProgress> {
        self.bar.as_ref().and(self.multi.clone())
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;

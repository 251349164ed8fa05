// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration consumed by the operation runtime
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::display::templates;
use crate::error::{OplogError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OplogConfig {
    /// Emit a record when an operation starts, not only when it ends
    pub log_on_start: bool,
    /// Logger name stamped on records and used by the tracing sink
    pub logger: String,
    /// Master switch for terminal rendering
    pub render: bool,
    /// Draw progress bars for progressable operations
    pub progress_bar: bool,
    pub spinner: SpinnerConfig,
}

impl Default for OplogConfig {
    fn default() -> Self {
        Self {
            log_on_start: false,
            logger: "oplog".to_string(),
            render: true,
            progress_bar: true,
            spinner: SpinnerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpinnerConfig {
    /// Named frame cycle; unknown names fall back to the default cycle
    pub template: String,
    /// Custom frames, taking precedence over `template`
    pub frames: Option<Vec<String>>,
    /// Delay between frames, overriding the template's
    pub interval_ms: Option<u64>,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            template: templates::DEFAULT_TEMPLATE.to_string(),
            frames: None,
            interval_ms: None,
        }
    }
}

impl SpinnerConfig {
    /// Resolve the frames and interval a spinner should use
    pub fn cycle(&self) -> (Vec<String>, Duration) {
        let template = templates::template_or_default(&self.template);
        let frames = match &self.frames {
            Some(frames) if !frames.is_empty() => frames.clone(),
            _ => template.frames.iter().map(|f| f.to_string()).collect(),
        };
        let interval_ms = self.interval_ms.unwrap_or(template.interval_ms);
        (frames, Duration::from_millis(interval_ms))
    }
}

impl OplogConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OplogError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| OplogError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Progress bars are drawn only when both switches are on
    pub fn show_progress_bar(&self) -> bool {
        self.render && self.progress_bar
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal display mechanisms attached to operations
//!
//! An operation owns at most one display: a [`ProgressIndicator`] or a
//! [`SpinnerAnimation`]. Placement depends only on ancestors that are
//! themselves rendering.

mod progress;
mod spinner;
pub mod templates;
mod terminal;

pub use progress::{indented_description, ProgressIndicator};
pub use spinner::{format_desc, SpinnerAnimation, SpinnerControl};
pub use templates::SpinnerTemplate;
pub use terminal::Terminal;

use indicatif::MultiProgress;
use std::time::Duration;

/// Display requested on an operation before it starts
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayRequest {
    Progress {
        total: Option<u64>,
    },
    Spinner {
        frames: Option<Vec<String>>,
        interval: Option<Duration>,
    },
}

/// Live display owned by a started operation
pub(crate) enum Display {
    Progress(ProgressIndicator),
    Spinner(SpinnerAnimation),
}

impl Display {
    pub(crate) fn as_ancestor(&self) -> AncestorDisplay {
        match self {
            Display::Progress(progress) => AncestorDisplay::Progress {
                rendering: progress.is_rendering(),
                group: progress.group(),
            },
            Display::Spinner(spinner) => AncestorDisplay::Spinner {
                control: spinner.control(),
            },
        }
    }
}

/// What a descendant needs to know about an ancestor's display
#[derive(Clone)]
pub(crate) enum AncestorDisplay {
    Progress {
        rendering: bool,
        group: Option<MultiProgress>,
    },
    /// `control` is `None` when the spinner is not running
    Spinner { control: Option<SpinnerControl> },
}

impl AncestorDisplay {
    fn is_rendering(&self) -> bool {
        match self {
            AncestorDisplay::Progress { rendering, .. } => *rendering,
            AncestorDisplay::Spinner { control } => control.is_some(),
        }
    }
}

/// Placement of a new display relative to its rendering ancestors
pub(crate) struct Layout {
    pub nesting_level: usize,
    pub cursor_offset: usize,
    pub parent_spinner: Option<SpinnerControl>,
    pub group: Option<MultiProgress>,
}

/// Compute placement from ancestors ordered root first
pub(crate) fn layout(ancestors: &[AncestorDisplay]) -> Layout {
    let rendering: Vec<&AncestorDisplay> = ancestors.iter().filter(|a| a.is_rendering()).collect();
    let nesting_level = rendering.len();

    let cursor_offset = match rendering.last() {
        Some(AncestorDisplay::Spinner { .. }) => 1,
        Some(AncestorDisplay::Progress { .. }) => nesting_level,
        None => 0,
    };

    // nearest running spinner, even with bars in between; only one loop may
    // draw at a time
    let parent_spinner = rendering.iter().rev().find_map(|a| match a {
        AncestorDisplay::Spinner { control } => control.clone(),
        AncestorDisplay::Progress { .. } => None,
    });

    let group = rendering.iter().rev().find_map(|a| match a {
        AncestorDisplay::Progress { group, .. } => group.clone(),
        AncestorDisplay::Spinner { .. } => None,
    });

    Layout {
        nesting_level,
        cursor_offset,
        parent_spinner,
        group,
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

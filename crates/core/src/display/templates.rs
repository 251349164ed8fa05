// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named spinner frame cycles

/// A frame cycle and the delay between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerTemplate {
    pub frames: &'static [&'static str],
    pub interval_ms: u64,
}

pub const DEFAULT_TEMPLATE: &str = "arrow3";

const TEMPLATES: &[(&str, SpinnerTemplate)] = &[
    (
        "arrow3",
        SpinnerTemplate {
            frames: &["▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸"],
            interval_ms: 120,
        },
    ),
    (
        "dots",
        SpinnerTemplate {
            frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            interval_ms: 80,
        },
    ),
    (
        "line",
        SpinnerTemplate {
            frames: &["-", "\\", "|", "/"],
            interval_ms: 130,
        },
    ),
    (
        "simple_dots",
        SpinnerTemplate {
            frames: &[".  ", ".. ", "...", "   "],
            interval_ms: 400,
        },
    ),
];

/// Look up a template by name
pub fn template(name: &str) -> Option<SpinnerTemplate> {
    TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, t)| *t)
}

/// Look up a template, falling back to the default cycle for unknown names
pub fn template_or_default(name: &str) -> SpinnerTemplate {
    match template(name) {
        Some(t) => t,
        None => {
            let known = names().collect::<Vec<_>>().join(", ");
            tracing::warn!(template = name, %known, "unknown spinner template, using {DEFAULT_TEMPLATE}");
            TEMPLATES[0].1
        }
    }
}

/// Names of the built-in templates, default first
pub fn names() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(n, _)| *n)
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;

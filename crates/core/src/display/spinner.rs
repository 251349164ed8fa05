// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Indeterminate terminal spinner with nested pause/resume
//!
//! Each running spinner owns one background render thread. The thread is
//! driven by control messages: it draws a frame, waits on its channel for one
//! interval, backspaces over the frame, then handles whatever arrived. A
//! paused loop blocks on the channel until resumed or stopped.

use super::terminal::Terminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Upper bound on waiting for a paused loop to acknowledge
const PAUSE_ACK_TIMEOUT: Duration = Duration::from_secs(1);

enum Control {
    /// Stop drawing; the sender is notified once the current frame is erased
    Pause(Sender<()>),
    Resume,
    Stop,
}

/// Handle for pausing and resuming a running spinner from a nested one
#[derive(Clone)]
pub struct SpinnerControl {
    tx: Sender<Control>,
    paused: Arc<AtomicBool>,
}

impl SpinnerControl {
    /// Pause the loop and wait until it has stopped writing
    pub fn pause(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.tx.send(Control::Pause(ack_tx)).is_err() {
            return;
        }
        self.paused.store(true, Ordering::SeqCst);
        if ack_rx.recv_timeout(PAUSE_ACK_TIMEOUT).is_err() {
            tracing::debug!("spinner did not acknowledge pause");
        }
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        let _ = self.tx.send(Control::Resume);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Frame line prefix: one `|   ` per nesting level, then the description
pub fn format_desc(desc: &str, nesting_level: usize) -> String {
    format!("{}|── {}:    ", "|   ".repeat(nesting_level), desc)
}

/// A terminal spinner bound to one operation
pub struct SpinnerAnimation {
    terminal: Terminal,
    frames: Vec<String>,
    interval: Duration,
    nesting_level: usize,
    cursor_offset: usize,
    disabled: bool,
    parent: Option<SpinnerControl>,
    paused_parent: Option<SpinnerControl>,
    control: Option<SpinnerControl>,
    thread: Option<JoinHandle<()>>,
}

impl SpinnerAnimation {
    /// Build a spinner; nothing is drawn until [`SpinnerAnimation::start`]
    ///
    /// `parent` is the nearest rendering ancestor spinner, if that ancestor
    /// is a spinner. It is paused for as long as this spinner runs.
    pub fn new(
        terminal: Terminal,
        desc: &str,
        frames: &[String],
        interval: Duration,
        nesting_level: usize,
        cursor_offset: usize,
        parent: Option<SpinnerControl>,
    ) -> Self {
        let prefix = format_desc(desc, nesting_level);
        let frames = if frames.is_empty() {
            vec![prefix]
        } else {
            frames.iter().map(|f| format!("{} {}", prefix, f)).collect()
        };
        Self {
            terminal,
            frames,
            interval,
            nesting_level,
            cursor_offset,
            disabled: false,
            parent,
            paused_parent: None,
            control: None,
            thread: None,
        }
    }

    /// Turn every stage into a no-op
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.control.as_ref().is_some_and(SpinnerControl::is_paused)
    }

    /// Control handle for nested spinners; `None` unless running
    pub fn control(&self) -> Option<SpinnerControl> {
        self.control.clone()
    }

    /// Spawn the render loop. Non-interactive or disabled output is a no-op.
    pub fn start(&mut self) {
        if self.disabled || !self.terminal.is_interactive() || self.thread.is_some() {
            return;
        }

        if let Some(parent) = self.parent.take() {
            parent.pause();
            self.paused_parent = Some(parent);
        }
        if self.cursor_offset > 0 {
            let _ = self.terminal.write_str(&"\n".repeat(self.cursor_offset));
        }

        let (tx, rx) = mpsc::channel();
        let terminal = self.terminal.clone();
        let frames = self.frames.clone();
        let interval = self.interval;
        let spawned = std::thread::Builder::new()
            .name("oplog-spinner".to_string())
            .spawn(move || spin(&terminal, &frames, interval, &rx));

        match spawned {
            Ok(handle) => {
                self.thread = Some(handle);
                self.control = Some(SpinnerControl {
                    tx,
                    paused: Arc::new(AtomicBool::new(false)),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn spinner thread");
                self.restore_cursor();
            }
        }
    }

    /// Stop the loop, erase the last frame, restore the cursor, and resume a
    /// paused parent. Safe to call more than once.
    pub fn terminate(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        if let Some(control) = self.control.take() {
            let _ = control.tx.send(Control::Stop);
        }
        if handle.join().is_err() {
            tracing::warn!("spinner thread panicked");
        }

        let width = self
            .frames
            .iter()
            .map(|f| f.chars().count())
            .max()
            .unwrap_or(0);
        let _ = self.terminal.erase(width);
        self.restore_cursor();
    }

    fn restore_cursor(&mut self) {
        let _ = self.terminal.move_up(self.cursor_offset);
        if let Some(parent) = self.paused_parent.take() {
            parent.resume();
        }
    }
}

impl Drop for SpinnerAnimation {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn spin(terminal: &Terminal, frames: &[String], interval: Duration, rx: &Receiver<Control>) {
    for frame in frames.iter().cycle() {
        let _ = terminal.write_str(frame);
        let msg = rx.recv_timeout(interval);
        let _ = terminal.backspace(frame.chars().count());

        match msg {
            Err(RecvTimeoutError::Timeout) | Ok(Control::Resume) => {}
            Ok(Control::Pause(ack)) => {
                let _ = ack.send(());
                if !wait_for_resume(rx) {
                    return;
                }
            }
            Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Block until resumed (true) or stopped (false)
fn wait_for_resume(rx: &Receiver<Control>) -> bool {
    loop {
        match rx.recv() {
            Ok(Control::Resume) => return true,
            Ok(Control::Pause(ack)) => {
                let _ = ack.send(());
            }
            Ok(Control::Stop) | Err(_) => return false,
        }
    }
}

#[cfg(test)]
#[path = "spinner_tests.rs"]
mod tests;

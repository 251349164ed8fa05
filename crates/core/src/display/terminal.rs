// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-oriented output stream for progress bars and spinners
//!
//! All rendering goes through a [`Terminal`] as raw control sequences. A
//! terminal that is not interactive never gets written to.

use indicatif::TermLike;
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

const DEFAULT_WIDTH: u16 = 80;

/// Shared in-memory writer used by [`Terminal::capture`]
#[derive(Clone, Default)]
struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct TerminalInner {
    out: Mutex<Box<dyn Write + Send>>,
    interactive: bool,
    width: u16,
    captured: Option<SharedBuffer>,
}

/// A cloneable handle to a rendering output stream
#[derive(Clone)]
pub struct Terminal {
    inner: Arc<TerminalInner>,
}

impl Terminal {
    /// Wrap an arbitrary writer
    pub fn from_writer(out: impl Write + Send + 'static, interactive: bool) -> Self {
        Self {
            inner: Arc::new(TerminalInner {
                out: Mutex::new(Box::new(out)),
                interactive,
                width: DEFAULT_WIDTH,
                captured: None,
            }),
        }
    }

    /// Standard error, interactive only when attached to a tty
    pub fn stderr() -> Self {
        let interactive = io::stderr().is_terminal();
        Self::from_writer(io::stderr(), interactive)
    }

    /// A terminal that renders nothing
    pub fn disabled() -> Self {
        Self::from_writer(io::sink(), false)
    }

    /// An interactive in-memory terminal; read it back with [`Terminal::contents`]
    pub fn capture() -> Self {
        let buffer = SharedBuffer::default();
        Self {
            inner: Arc::new(TerminalInner {
                out: Mutex::new(Box::new(buffer.clone())),
                interactive: true,
                width: DEFAULT_WIDTH,
                captured: Some(buffer),
            }),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.inner.interactive
    }

    /// Everything written so far, for terminals built with [`Terminal::capture`]
    pub fn contents(&self) -> String {
        match &self.inner.captured {
            Some(buffer) => {
                let bytes = buffer.bytes.lock().unwrap_or_else(|e| e.into_inner());
                String::from_utf8_lossy(&bytes).to_string()
            }
            None => String::new(),
        }
    }

    /// Write and flush in one step so concurrent writers never interleave a sequence
    pub fn write_str(&self, s: &str) -> io::Result<()> {
        let mut out = self.inner.out.lock().unwrap_or_else(|e| e.into_inner());
        out.write_all(s.as_bytes())?;
        out.flush()
    }

    pub fn backspace(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.write_str(&"\x08".repeat(n))
    }

    /// Overwrite the next `n` cells with spaces, leaving the cursor where it was
    pub fn erase(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.write_str(&format!("{}{}", " ".repeat(n), "\x08".repeat(n)))
    }

    pub fn move_up(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.write_str(&format!("\x1b[{}A", n))
    }

    pub fn move_down(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        self.write_str(&format!("\x1b[{}B", n))
    }

    pub fn erase_line(&self) -> io::Result<()> {
        self.write_str("\r\x1b[2K")
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("interactive", &self.inner.interactive)
            .field("width", &self.inner.width)
            .finish()
    }
}

// Lets indicatif draw progress bars onto the same stream as spinners.
impl TermLike for Terminal {
    fn width(&self) -> u16 {
        self.inner.width
    }

    fn height(&self) -> u16 {
        u16::MAX
    }

    fn move_cursor_up(&self, n: usize) -> io::Result<()> {
        self.move_up(n)
    }

    fn move_cursor_down(&self, n: usize) -> io::Result<()> {
        self.move_down(n)
    }

    fn move_cursor_right(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        Terminal::write_str(self, &format!("\x1b[{}C", n))
    }

    fn move_cursor_left(&self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        Terminal::write_str(self, &format!("\x1b[{}D", n))
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        Terminal::write_str(self, &format!("{}\n", s))
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        Terminal::write_str(self, s)
    }

    fn clear_line(&self) -> io::Result<()> {
        self.erase_line()
    }

    fn flush(&self) -> io::Result<()> {
        let mut out = self.inner.out.lock().unwrap_or_else(|e| e.into_inner());
        out.flush()
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;

//! Terminal rendering with per-cell diffing.
//!
//! Drawing goes through the [`Terminal`] trait so rendering logic is testable
//! without a TTY.  The real implementation, [`AnsiTerminal`], positions the
//! cursor with ANSI escape sequences and batches writes behind one flush per
//! frame.

use std::io::Write;

use tracing::warn;

use ttycam_core::CharFrame;

/// The drawing operations the renderer needs from a terminal.
#[cfg_attr(test, mockall::automock)]
pub trait Terminal {
    fn clear_screen(&mut self);
    /// Writes `ch` at the given zero-based grid position.
    fn move_and_write(&mut self, row: usize, col: usize, ch: char);
    fn flush(&mut self);
}

/// ANSI escape sequence terminal writing to stdout.
pub struct AnsiTerminal {
    out: std::io::Stdout,
}

impl AnsiTerminal {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for AnsiTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for AnsiTerminal {
    fn clear_screen(&mut self) {
        // ED 2 (erase display) then cursor home.
        if let Err(e) = self.out.write_all(b"\x1b[2J\x1b[H") {
            warn!("terminal write failed: {e}");
        }
    }

    fn move_and_write(&mut self, row: usize, col: usize, ch: char) {
        // CUP is 1-based.
        let mut buf = [0u8; 4];
        let seq = format!("\x1b[{};{}H{}", row + 1, col + 1, ch.encode_utf8(&mut buf));
        if let Err(e) = self.out.write_all(seq.as_bytes()) {
            warn!("terminal write failed: {e}");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!("terminal flush failed: {e}");
        }
    }
}

/// Renders `new` on top of what `old` left on screen.
///
/// With a prior frame of the same shape, only changed cells are written.  A
/// shape change (or no prior frame) clears the screen and redraws every cell.
/// Identical frames touch the terminal not at all, not even a flush.
pub fn display<T: Terminal + ?Sized>(new: &CharFrame, old: Option<&CharFrame>, term: &mut T) {
    match old.and_then(|old| new.diff(old)) {
        Some(updates) if updates.is_empty() => {}
        Some(updates) => {
            for update in updates {
                term.move_and_write(update.row, update.col, update.ch);
            }
            term.flush();
        }
        None => {
            term.clear_screen();
            for (row, col, ch) in new.cells() {
                term.move_and_write(row, col, ch);
            }
            term.flush();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::buffer::Redraw;
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a buffer sized for a typical redraw (4KB).
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(4096),
        }
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Erase from the start of the line to the cursor.
    #[inline]
    pub fn erase_line_start(&mut self) {
        self.data.extend_from_slice(b"\x1b[1K");
    }

    /// Move the cursor up `rows` rows. Nothing is emitted for zero.
    #[inline]
    pub fn cursor_up(&mut self, rows: usize) {
        if rows > 0 {
            // CSI n A
            let _ = write!(self.data, "\x1b[{rows}A");
        }
    }

    /// Move the cursor to column 0.
    #[inline]
    pub fn cursor_column_zero(&mut self) {
        self.data.push(b'\r');
    }

    /// Clear from the cursor to the end of the screen.
    #[inline]
    pub fn clear_below(&mut self) {
        self.data.extend_from_slice(b"\x1b[J");
    }

    /// Write lines separated by newline + carriage return (raw mode does not
    /// return the carriage on its own).
    pub fn write_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.data.extend_from_slice(b"\n\r");
            }
            self.write_str(line.as_ref());
        }
    }

    /// Encode a [`Redraw`]: erase the current line, climb to the top of the
    /// affected region, clear everything below and write the new lines.
    pub fn redraw(&mut self, redraw: &Redraw) {
        self.erase_line_start();
        self.cursor_up(redraw.move_up);
        self.cursor_column_zero();
        self.clear_below();
        self.write_lines(&redraw.lines);
    }

    /// Push the cursor `rows` lines down and come back, so later redraws
    /// have room without scrolling earlier output away.
    pub fn reserve_rows(&mut self, rows: usize) {
        for _ in 0..rows {
            self.data.push(b'\n');
        }
        self.cursor_column_zero();
        self.cursor_up(rows);
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//! `RenderBuffer`: wrapped display lines plus paragraph boundaries.
//!
//! The buffer stores what is currently on screen as a flat list of display
//! lines. Paragraph boundaries index the last line of each paragraph the
//! user closed with Enter; everything after the last boundary is the open
//! text still being typed.
//!
//! ```text
//!   lines        boundaries = [1]
//!   0 "hello "   ┐
//!   1 "world"    ┘ paragraph 0
//!   2 "again"      open text
//! ```

use super::backspace::erase_cluster;
use super::wrap::{expand_tabs, wrap};
use crate::command::{ReplaceDirective, SlashMatch};

/// Cursor movement and lines needed to bring the screen in sync after a
/// mutation.
///
/// The cursor sits at the end of the last drawn line. Redrawing moves it up
/// `move_up` rows, clears to the end of the screen and writes `lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redraw {
    /// Rows to move up from the current cursor row.
    pub move_up: usize,
    /// Lines to write after clearing.
    pub lines: Vec<String>,
}

/// Terminal rows the given lines occupy at `width`.
///
/// Every line takes at least one row, even when empty.
pub fn rows(lines: &[String], width: usize) -> usize {
    lines.iter().map(|line| wrap(line, width).len().max(1)).sum()
}

/// Wrap text that must occupy at least one line.
fn wrap_at_least_one(text: &str, width: usize) -> Vec<String> {
    let mut lines = wrap(text, width);
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Wrapped display lines and paragraph boundaries.
///
/// Never empty: there is always at least one (possibly empty) line, and
/// every boundary is a valid, strictly increasing line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    lines: Vec<String>,
    boundaries: Vec<usize>,
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBuffer {
    /// An empty buffer: one empty line, no paragraphs.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            boundaries: Vec::new(),
        }
    }

    /// Display lines, top to bottom.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the last line of each closed paragraph.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Index of the first line of the open text.
    fn open_start(&self) -> usize {
        self.boundaries.last().map_or(0, |b| b + 1)
    }

    /// The open (unconfirmed) text, with wrap breaks removed.
    pub fn open_text(&self) -> String {
        self.lines[self.open_start().min(self.lines.len())..].concat()
    }

    /// Logical text of every paragraph, with wrap breaks removed. The last
    /// element is the open text.
    pub fn paragraphs(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.boundaries.len() + 1);
        let mut start = 0;
        for &end in &self.boundaries {
            out.push(self.lines[start..=end].concat());
            start = end + 1;
        }
        out.push(self.open_text());
        out
    }

    /// Back to the empty state.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
        self.boundaries.clear();
    }

    /// Append one character to the open text and re-wrap only the last line.
    pub fn push_char(&mut self, ch: char, width: usize) -> Redraw {
        let mut last = self.lines.pop().unwrap_or_default();
        let move_up = rows(std::slice::from_ref(&last), width).saturating_sub(1);

        last.push(ch);
        let wrapped = wrap_at_least_one(&last, width);
        self.lines.extend(wrapped.iter().cloned());

        Redraw {
            move_up,
            lines: wrapped,
        }
    }

    /// Remove the last perceived character of the open text.
    ///
    /// Returns `true` when the line structure changed and a full rewrap is
    /// needed to drop the now-empty trailing line. When the trailing line
    /// was already empty this retracts the last paragraph boundary instead,
    /// joining the open text back onto the previous paragraph.
    pub fn erase(&mut self, slash: &mut SlashMatch) -> bool {
        let count = self.lines.len();
        let Some(last) = self.lines.last_mut() else {
            return false;
        };

        if !last.is_empty() {
            erase_cluster(last, slash);
            return last.is_empty() && count > 1;
        }
        if count > 1 {
            if self.boundaries.last() == Some(&(count - 2)) {
                self.boundaries.pop();
            }
            return true;
        }
        false
    }

    /// Close the open text as a paragraph.
    ///
    /// The new boundary is never placed on an already closed line, so
    /// pressing Enter twice yields an empty paragraph in between rather than
    /// a duplicate boundary.
    pub fn close_paragraph(&mut self) {
        let next = self.open_start();
        let last_line = self.lines.len().saturating_sub(1);
        self.boundaries.push(last_line.max(next));
    }

    /// Re-wrap every paragraph and the open text against `width`.
    pub fn rewrap(&mut self, width: usize) -> Redraw {
        let move_up = rows(&self.lines, width).saturating_sub(1);
        self.reflow(width);
        Redraw {
            move_up,
            lines: self.lines.clone(),
        }
    }

    /// Substitute the whole buffer, then re-wrap it against `width`.
    ///
    /// `directive` must satisfy [`ReplaceDirective::validate`]. Tabs in the
    /// replacement lines are expanded.
    pub fn replace(&mut self, directive: ReplaceDirective, width: usize) -> Redraw {
        let move_up = rows(&self.lines, width).saturating_sub(1);
        self.lines = directive
            .lines
            .iter()
            .map(|line| expand_tabs(line, 0))
            .collect();
        self.boundaries = directive.boundaries;
        self.reflow(width);
        Redraw {
            move_up,
            lines: self.lines.clone(),
        }
    }

    /// A copy of the buffer with `suffix` removed from the end of the open
    /// text, which is collapsed onto a single line.
    pub fn without_suffix(&self, suffix: &str) -> ReplaceDirective {
        let start = self.open_start().min(self.lines.len());
        let open = self.open_text();
        let stripped = open.strip_suffix(suffix).unwrap_or(&open);

        let mut lines = self.lines[..start].to_vec();
        lines.push(stripped.to_string());
        ReplaceDirective {
            lines,
            boundaries: self.boundaries.clone(),
        }
    }

    fn reflow(&mut self, width: usize) {
        let mut wrapped = Vec::with_capacity(self.lines.len() + 1);
        let mut boundaries = Vec::with_capacity(self.boundaries.len());
        let mut start = 0;

        for &end in &self.boundaries {
            let paragraph = self.lines[start..=end].concat();
            wrapped.extend(wrap_at_least_one(&paragraph, width));
            boundaries.push(wrapped.len() - 1);
            start = end + 1;
        }

        if start < self.lines.len() {
            let open = self.lines[start..].concat();
            wrapped.extend(wrap_at_least_one(&open, width));
        } else {
            wrapped.push(String::new());
        }

        self.lines = wrapped;
        self.boundaries = boundaries;
    }
}

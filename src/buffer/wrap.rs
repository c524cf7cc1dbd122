//! Display-width measurement and whitespace-preserving word wrap.
//!
//! Widths are measured per grapheme with `unicode-width`, so wide (CJK,
//! emoji) and zero-width (combining) code points count correctly. CSI
//! escape sequences are treated as zero-width atoms and never split. Tabs
//! are expanded to spaces before text reaches the buffer, since their width
//! depends on the column they start at.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ESC: char = '\x1b';

/// Columns between tab stops.
const TAB_WIDTH: usize = 8;

/// Split `text` into atoms: whole CSI escape sequences or single graphemes.
fn atoms(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let len = escape_len(rest)
            .or_else(|| rest.graphemes(true).next().map(str::len))
            .unwrap_or(rest.len());
        let (atom, tail) = rest.split_at(len);
        rest = tail;
        Some(atom)
    })
}

/// Byte length of a CSI sequence at the start of `text`, if there is one.
fn escape_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'\x1b' || bytes[1] != b'[' {
        return None;
    }
    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    bytes[2..]
        .iter()
        .position(|b| (0x40..=0x7e).contains(b))
        .map(|pos| pos + 3)
}

fn atom_width(atom: &str) -> usize {
    if atom.starts_with(ESC) {
        0
    } else {
        UnicodeWidthStr::width(atom)
    }
}

/// Number of terminal columns `text` occupies.
///
/// Escape sequences contribute nothing; every other grapheme contributes
/// its Unicode display width.
pub fn display_width(text: &str) -> usize {
    atoms(text).map(atom_width).sum()
}

/// Whether a code point takes up no columns on its own (combining marks,
/// joiners, variation selectors).
pub fn is_zero_width(c: char) -> bool {
    UnicodeWidthChar::width(c) == Some(0)
}

/// Replace every tab with spaces up to the next tab stop, with `text`
/// starting at `column`.
pub fn expand_tabs(text: &str, column: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = column;
    for atom in atoms(text) {
        match atom {
            "\t" => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.push_str(&" ".repeat(pad));
                column += pad;
            }
            "\n" | "\r\n" => {
                out.push_str(atom);
                column = 0;
            }
            _ => {
                out.push_str(atom);
                column += atom_width(atom);
            }
        }
    }
    out
}

/// Split a line into alternating whitespace and non-whitespace runs.
fn runs(line: &str) -> impl Iterator<Item = &str> {
    let mut rest = line;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = first.is_whitespace();
        let len = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != space)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(len);
        rest = tail;
        Some(run)
    })
}

/// Wrap `text` to lines of at most `width` columns.
///
/// Whitespace is kept exactly where it was typed, so joining the returned
/// lines gives back `text` without its newlines. A run that does not fit
/// moves to the next line; a run wider than a whole line is broken at
/// grapheme boundaries. Empty input yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            wrap_line(line, width, &mut lines);
        }
    }
    lines
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut used = 0;

    for run in runs(line) {
        let run_width = display_width(run);
        if used + run_width <= width {
            current.push_str(run);
            used += run_width;
            continue;
        }
        if run_width <= width {
            out.push(std::mem::take(&mut current));
            current.push_str(run);
            used = run_width;
            continue;
        }
        // Longer than a whole line: fill what is left, then break.
        for atom in atoms(run) {
            let w = atom_width(atom);
            if used + w > width && used > 0 {
                out.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push_str(atom);
            used += w;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

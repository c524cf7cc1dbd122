//! Width-aware backspace.
//!
//! One backspace removes one visually perceived character. Zero-width code
//! points (combining marks, joiners) are removed together with the code
//! point they attach to, so no orphaned mark is ever left behind.

use super::wrap::is_zero_width;
use crate::command::SlashMatch;

/// Remove the last perceived character from `text`.
///
/// Pops code points from the end, keeping `slash` in step with what was
/// removed. Popping continues while the code point now at the end is
/// zero-width, or while only zero-width code points have been removed so
/// far. Returns `true` if anything was removed.
pub fn erase_cluster(text: &mut String, slash: &mut SlashMatch) -> bool {
    let mut removed_any = false;
    let mut width_deleted = false;

    while let Some(removed) = text.pop() {
        removed_any = true;
        slash.retract(removed);

        let removed_zero = is_zero_width(removed);
        if !removed_zero {
            width_deleted = true;
        }

        let next_zero = text.chars().next_back().is_some_and(is_zero_width);
        if !(next_zero || (removed_zero && !width_deleted)) {
            break;
        }
    }

    removed_any
}

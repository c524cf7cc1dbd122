//! Terminal driver surface consumed by the workers.
//!
//! The capture worker only needs dimensions and timed key reads
//! ([`KeySource`]); the render worker only needs the width and a way to
//! write bytes ([`Screen`]). Both are traits so the workers can be driven by
//! scripted fakes; [`CrosstermKeys`] and [`CrosstermScreen`] bind them to
//! the real terminal.

mod backend;
mod output;

pub use backend::{CrosstermKeys, CrosstermScreen, RawModeGuard};
pub use output::OutputBuffer;

use crate::actor::InputEvent;
use std::io;
use std::time::Duration;

/// Source of keystrokes and terminal dimensions.
pub trait KeySource {
    /// Terminal size as `(columns, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Wait up to `timeout` for one key. `Ok(None)` when nothing arrived or
    /// the key is not one the input surface handles.
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Destination for redraw output.
pub trait Screen {
    /// Current width in columns.
    fn width(&self) -> io::Result<usize>;

    /// Write and flush `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

//! Message types for actor communication.
//!
//! These types define the protocol between the capture and render workers.

/// One captured keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A printable character.
    Char(char),
    /// Backspace key.
    Backspace,
    /// Delete key (treated like backspace).
    Delete,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+D.
    Eof,
}

impl InputEvent {
    /// Whether this key ends the session.
    pub const fn is_terminate(self) -> bool {
        matches!(self, Self::Escape | Self::Interrupt | Self::Eof)
    }
}

/// Events delivered together as one queue item, in capture order.
pub type EventBatch = Vec<InputEvent>;

/// Result of one worker step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Orderly shutdown was requested.
    Terminate,
}

//! # Slate
//!
//! A multi-line terminal text input with live word-wrap.
//!
//! Slate turns raw keystrokes into an editable, word-wrapped, multi-paragraph
//! text buffer drawn inline in the terminal, redrawing only the rows that
//! changed as text is typed or deleted.
//!
//! ## Core Concepts
//!
//! - **Two workers**: a capture thread reads keys and a render thread applies
//!   them, joined by a batch queue plus exit and resizing flags
//! - **Paragraph boundaries**: Enter closes a paragraph; wrapping never moves
//!   text across a boundary
//! - **Cluster-aware backspace**: one backspace removes a whole combining
//!   cluster
//! - **Slash commands**: `\name` tokens expand to literal text or act on the
//!   whole buffer
//!
//! ## Example
//!
//! ```rust
//! use slate::{Editor, InputEvent};
//!
//! let mut editor = Editor::new();
//! for ch in "hello world".chars() {
//!     editor.apply(InputEvent::Char(ch), 10).unwrap();
//! }
//! assert_eq!(editor.buffer().lines(), ["hello ", "world"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod command;
pub mod editor;
pub mod error;
pub mod terminal;

// Re-exports for convenience
pub use actor::{CaptureConfig, Engine, EngineConfig, InputEvent, RenderConfig};
pub use buffer::{Redraw, RenderBuffer};
pub use command::{
    CommandEntry, CommandExtension, CommandTable, ExtensionError, ExtensionResult, MergePolicy,
    NoExtension,
};
pub use editor::{Applied, Editor};
pub use error::{Error, Result};

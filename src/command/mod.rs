//! Slash commands: backslash-prefixed tokens resolved to literal text or a
//! buffer-wide control action.
//!
//! - [`CommandTable`]: ordered name → [`CommandEntry`] mapping
//! - [`SlashMatch`]: tracking of the token being typed
//! - [`SlashEngine`]: resolution into a [`ReplaceDirective`]
//! - [`CommandExtension`]: host hook for custom control codes

mod slash;
mod table;

pub use slash::{
    CommandExtension, ExtensionError, ExtensionResult, NoExtension, ReplaceDirective, SlashEngine,
    SlashMatch, SENTINEL,
};
pub use table::{CommandEntry, CommandTable, MergePolicy, CLEAR, LIST};

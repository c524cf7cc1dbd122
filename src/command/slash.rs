//! Slash-command tracking and resolution.
//!
//! While the user types, [`SlashMatch`] follows the backslash-prefixed token
//! at the end of the open text. After each character the [`SlashEngine`]
//! looks the token up in its [`CommandTable`] and, on a hit, produces a
//! [`ReplaceDirective`] that substitutes the whole buffer.

use std::panic::{self, AssertUnwindSafe};

use super::table::{CommandEntry, CommandTable, CLEAR, LIST};
use crate::buffer::RenderBuffer;
use crate::error::{Error, Result};

/// First character of every slash token.
pub const SENTINEL: char = '\\';

/// Slash-token tracking state.
///
/// The token always starts with [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashMatch {
    active: bool,
    token: String,
}

impl Default for SlashMatch {
    fn default() -> Self {
        Self {
            active: false,
            token: SENTINEL.to_string(),
        }
    }
}

impl SlashMatch {
    /// Fresh, inactive state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a token is being tracked.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The token typed so far, sentinel included.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Stop tracking and reset the token to the sentinel.
    pub fn reset(&mut self) {
        self.active = false;
        self.token.clear();
        self.token.push(SENTINEL);
    }

    /// Update the state for a newly typed character.
    ///
    /// A backslash starts tracking; a second one while tracking restarts the
    /// token. Whitespace cancels tracking. Anything else extends the token.
    pub fn observe(&mut self, ch: char) {
        if ch == SENTINEL {
            if self.active {
                self.reset();
            }
            self.active = true;
        } else if ch.is_whitespace() {
            if self.active {
                self.reset();
            }
        } else if self.active {
            self.token.push(ch);
        }
    }

    /// Update the state for a code point removed by backspace.
    pub fn retract(&mut self, removed: char) {
        if removed == SENTINEL {
            self.reset();
        } else if self.active && self.token.len() > SENTINEL.len_utf8() {
            self.token.pop();
        }
    }
}

/// A full buffer substitution produced by resolving a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceDirective {
    /// Replacement display lines.
    pub lines: Vec<String>,
    /// Replacement paragraph boundaries.
    pub boundaries: Vec<usize>,
}

impl ReplaceDirective {
    /// The empty buffer.
    pub fn cleared() -> Self {
        Self {
            lines: vec![String::new()],
            boundaries: Vec::new(),
        }
    }

    /// Check the buffer invariants: at least one line, boundaries strictly
    /// increasing and pointing at existing lines.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.lines.is_empty() {
            return Err("returned an empty buffer".to_string());
        }
        if let Some(&last) = self.boundaries.last() {
            if last >= self.lines.len() {
                return Err(format!(
                    "boundary {last} is past the last line ({})",
                    self.lines.len() - 1
                ));
            }
        }
        if self.boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err("boundaries are not strictly increasing".to_string());
        }
        Ok(())
    }
}

/// Failure reported by a [`CommandExtension`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    /// The extension does not know this control code.
    #[error("unsupported control code {0}")]
    Unsupported(i32),
    /// The extension could not compute a result.
    #[error("{0}")]
    Failed(String),
}

/// What a [`CommandExtension`] returns: replacement lines and boundaries.
pub type ExtensionResult = std::result::Result<(Vec<String>, Vec<usize>), ExtensionError>;

/// Host hook for control codes other than the built-in clear and list.
///
/// Receives copies of the buffer (with the command token already removed)
/// and must return the replacement lines and boundaries.
pub trait CommandExtension: Send {
    /// Run the custom command `code`.
    fn run(
        &mut self,
        code: i32,
        lines: Vec<String>,
        boundaries: Vec<usize>,
    ) -> ExtensionResult;
}

impl<F> CommandExtension for F
where
    F: FnMut(i32, Vec<String>, Vec<usize>) -> ExtensionResult + Send,
{
    fn run(
        &mut self,
        code: i32,
        lines: Vec<String>,
        boundaries: Vec<usize>,
    ) -> ExtensionResult {
        self(code, lines, boundaries)
    }
}

/// Extension that leaves the buffer untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExtension;

impl CommandExtension for NoExtension {
    fn run(
        &mut self,
        _code: i32,
        lines: Vec<String>,
        boundaries: Vec<usize>,
    ) -> ExtensionResult {
        Ok((lines, boundaries))
    }
}

/// Token tracking plus resolution against a command table.
pub struct SlashEngine {
    state: SlashMatch,
    table: CommandTable,
    extension: Box<dyn CommandExtension>,
}

impl std::fmt::Debug for SlashEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlashEngine")
            .field("state", &self.state)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl Default for SlashEngine {
    fn default() -> Self {
        Self::new(CommandTable::default(), Box::new(NoExtension))
    }
}

impl SlashEngine {
    /// Create an engine resolving against `table`, delegating custom control
    /// codes to `extension`.
    pub fn new(table: CommandTable, extension: Box<dyn CommandExtension>) -> Self {
        Self {
            state: SlashMatch::new(),
            table,
            extension,
        }
    }

    /// Current tracking state.
    pub const fn state(&self) -> &SlashMatch {
        &self.state
    }

    /// Mutable tracking state, for backspace bookkeeping.
    pub fn state_mut(&mut self) -> &mut SlashMatch {
        &mut self.state
    }

    /// Try to resolve the current token against `buffer`.
    ///
    /// Returns `Ok(None)` when nothing matches. On a match the tracking
    /// state is reset. Extension failures become [`Error::ExternalCommand`].
    pub fn resolve(&mut self, buffer: &RenderBuffer) -> Result<Option<ReplaceDirective>> {
        if !self.state.is_active() {
            return Ok(None);
        }
        let Some(entry) = self.table.lookup(self.state.token()).cloned() else {
            return Ok(None);
        };

        let stripped = buffer.without_suffix(self.state.token());
        let directive = match entry {
            CommandEntry::Literal(text) => {
                let mut lines = stripped.lines;
                if let Some(last) = lines.last_mut() {
                    last.push_str(&text);
                }
                ReplaceDirective {
                    lines,
                    boundaries: stripped.boundaries,
                }
            }
            CommandEntry::Control { code: CLEAR, .. } => ReplaceDirective::cleared(),
            CommandEntry::Control { code: LIST, .. } => self.listing(),
            CommandEntry::Control { code, .. } => self.run_extension(code, stripped)?,
        };

        tracing::debug!(token = %self.state.token(), "slash command resolved");
        self.state.reset();
        Ok(Some(directive))
    }

    /// One paragraph per registered command.
    fn listing(&self) -> ReplaceDirective {
        let lines: Vec<String> = self
            .table
            .iter()
            .map(|(name, entry)| format!("{name} : {}", entry.description()))
            .collect();
        let boundaries = (0..lines.len()).collect();
        ReplaceDirective { lines, boundaries }
    }

    fn run_extension(&mut self, code: i32, input: ReplaceDirective) -> Result<ReplaceDirective> {
        let extension = &mut self.extension;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            extension.run(code, input.lines, input.boundaries)
        }));

        let (lines, boundaries) = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                return Err(Error::ExternalCommand {
                    code,
                    reason: e.to_string(),
                })
            }
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "extension panicked".to_string());
                return Err(Error::ExternalCommand { code, reason });
            }
        };

        let directive = ReplaceDirective { lines, boundaries };
        directive
            .validate()
            .map_err(|reason| Error::ExternalCommand { code, reason })?;
        Ok(directive)
    }
}

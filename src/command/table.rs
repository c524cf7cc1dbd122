//! Ordered command table and its merge rules.

use indexmap::IndexMap;

use super::slash::SENTINEL;
use crate::error::{Error, Result};

/// Control code of the built-in clear command.
pub const CLEAR: i32 = -1;
/// Control code of the built-in list command.
pub const LIST: i32 = -2;

/// What a command name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEntry {
    /// Text inserted in place of the token.
    Literal(String),
    /// A buffer-wide action selected by a control code.
    Control {
        /// Negative codes -1 and -2 are built in; others go to the extension.
        code: i32,
        /// Shown by the list command.
        description: String,
    },
}

impl CommandEntry {
    /// Build a control entry.
    pub fn control(code: i32, description: impl Into<String>) -> Self {
        Self::Control {
            code,
            description: description.into(),
        }
    }

    /// Text shown for this entry by the list command.
    pub fn description(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Control { description, .. } => description,
        }
    }
}

/// How a host table combines with the built-in commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Keep the built-ins next to the host commands.
    pub extend_defaults: bool,
    /// Allow host commands to replace built-ins.
    pub overwrite: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            extend_defaults: true,
            overwrite: false,
        }
    }
}

/// Ordered mapping from command name to [`CommandEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    entries: IndexMap<String, CommandEntry>,
}

impl Default for CommandTable {
    fn default() -> Self {
        let mut entries = IndexMap::new();
        entries.insert("clr".to_string(), CommandEntry::control(CLEAR, "Clears all text"));
        entries.insert(
            "help".to_string(),
            CommandEntry::control(LIST, "Shows all slash commands"),
        );
        Self { entries }
    }
}

impl CommandTable {
    /// Combine a host table with the defaults under `policy`.
    ///
    /// Without collisions, host commands come first and the defaults follow.
    /// Colliding names are an error unless `overwrite` is set, in which case
    /// the surviving defaults come first and the host entries after them.
    /// Dropping the defaults altogether also requires `overwrite`.
    pub fn merged(
        custom: impl IntoIterator<Item = (String, CommandEntry)>,
        policy: MergePolicy,
    ) -> Result<Self> {
        let custom: IndexMap<String, CommandEntry> = custom.into_iter().collect();
        let defaults = Self::default().entries;

        if !policy.extend_defaults {
            if !policy.overwrite {
                return Err(Error::CommandTable(
                    "replacing the default commands requires overwrite".to_string(),
                ));
            }
            return Ok(Self { entries: custom });
        }

        let colliding: Vec<&String> = custom.keys().filter(|k| defaults.contains_key(*k)).collect();
        let entries = if colliding.is_empty() {
            custom.into_iter().chain(defaults).collect()
        } else if policy.overwrite {
            let kept: Vec<(String, CommandEntry)> = defaults
                .into_iter()
                .filter(|(name, _)| !custom.contains_key(name))
                .collect();
            kept.into_iter().chain(custom).collect()
        } else {
            let names: Vec<&str> = colliding.iter().map(|s| s.as_str()).collect();
            return Err(Error::CommandTable(format!(
                "cannot overwrite default commands without overwrite: {}",
                names.join(", ")
            )));
        };

        Ok(Self { entries })
    }

    /// Look up a token, ignoring its leading backslashes.
    pub fn lookup(&self, token: &str) -> Option<&CommandEntry> {
        self.entries.get(token.trim_start_matches(SENTINEL))
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

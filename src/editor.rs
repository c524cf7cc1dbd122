//! Editor: applies input events to the render buffer.
//!
//! This is the terminal-free half of the render worker. It owns the
//! [`RenderBuffer`] and the [`SlashEngine`] and turns each [`InputEvent`]
//! into buffer mutations plus the [`Redraw`]s that keep the screen in step.

use crate::actor::InputEvent;
use crate::buffer::{display_width, expand_tabs, Redraw, RenderBuffer};
use crate::command::{CommandExtension, CommandTable, SlashEngine, SlashMatch};
use crate::error::Result;

/// What applying one event requires from the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The buffer changed locally; draw these in order.
    Drawn(Vec<Redraw>),
    /// The line structure changed; a full rewrap must follow.
    NeedsRewrap,
    /// Nothing to do (terminate keys belong to the capture worker).
    Ignored,
}

/// Buffer plus slash-command state.
#[derive(Debug, Default)]
pub struct Editor {
    buffer: RenderBuffer,
    slash: SlashEngine,
}

impl Editor {
    /// An empty editor with the default command table.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty editor resolving slash commands against `table`.
    pub fn with_commands(table: CommandTable, extension: Box<dyn CommandExtension>) -> Self {
        Self {
            buffer: RenderBuffer::new(),
            slash: SlashEngine::new(table, extension),
        }
    }

    /// The render buffer.
    pub const fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Current slash-token state.
    pub const fn slash(&self) -> &SlashMatch {
        self.slash.state()
    }

    /// Apply one event at terminal width `width`.
    ///
    /// Fails only when a slash command's extension fails.
    pub fn apply(&mut self, event: InputEvent, width: usize) -> Result<Applied> {
        match event {
            InputEvent::Char('\t') => self.type_tab(width).map(Applied::Drawn),
            InputEvent::Char(ch) => self.type_char(ch, width).map(Applied::Drawn),
            InputEvent::Backspace | InputEvent::Delete => {
                self.buffer.erase(self.slash.state_mut());
                Ok(Applied::NeedsRewrap)
            }
            InputEvent::Enter => {
                if self.slash.state().is_active() {
                    self.slash.state_mut().reset();
                }
                self.buffer.close_paragraph();
                Ok(Applied::NeedsRewrap)
            }
            InputEvent::Escape | InputEvent::Interrupt | InputEvent::Eof => Ok(Applied::Ignored),
        }
    }

    /// Full rewrap against `width`.
    pub fn rewrap(&mut self, width: usize) -> Redraw {
        self.buffer.rewrap(width)
    }

    /// A tab becomes the spaces that reach the next tab stop on screen.
    fn type_tab(&mut self, width: usize) -> Result<Vec<Redraw>> {
        let column = self.buffer.lines().last().map_or(0, |line| display_width(line));
        let mut redraws = Vec::new();
        for ch in expand_tabs("\t", column).chars() {
            redraws.extend(self.type_char(ch, width)?);
        }
        Ok(redraws)
    }

    fn type_char(&mut self, ch: char, width: usize) -> Result<Vec<Redraw>> {
        self.slash.state_mut().observe(ch);
        let mut redraws = vec![self.buffer.push_char(ch, width)];

        if let Some(directive) = self.slash.resolve(&self.buffer)? {
            redraws.push(self.buffer.replace(directive, width));
        }
        Ok(redraws)
    }
}

//! Crossterm-backed terminal driver.
//!
//! Key capture polls crossterm events with a timeout and maps key presses
//! onto [`InputEvent`]; the screen writes pre-built escape sequences to
//! stdout in one call.

use super::{KeySource, Screen};
use crate::actor::InputEvent;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Raw mode for as long as the guard lives.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enter raw mode.
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Keyboard input from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermKeys;

impl CrosstermKeys {
    /// Convert a crossterm event to our `InputEvent`.
    fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            // Only process key press events (not release or repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::convert_key(key),
            _ => None,
        }
    }

    fn convert_key(key: KeyEvent) -> Option<InputEvent> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        Some(match key.code {
            KeyCode::Char('c') if control => InputEvent::Interrupt,
            KeyCode::Char('d') if control => InputEvent::Eof,
            KeyCode::Char(_) if control => return None,
            KeyCode::Char(c) => InputEvent::Char(c),
            KeyCode::Tab => InputEvent::Char('\t'),
            KeyCode::Enter => InputEvent::Enter,
            KeyCode::Backspace => InputEvent::Backspace,
            KeyCode::Delete => InputEvent::Delete,
            KeyCode::Esc => InputEvent::Escape,
            _ => return None,
        })
    }
}

impl KeySource for CrosstermKeys {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Self::convert_event(event::read()?))
    }
}

/// Output to stdout.
#[derive(Debug)]
pub struct CrosstermScreen {
    stdout: Stdout,
}

impl CrosstermScreen {
    /// Screen on the process's stdout.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for CrosstermScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CrosstermScreen {
    fn width(&self) -> io::Result<usize> {
        terminal::size().map(|(cols, _)| usize::from(cols))
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        lock.write_all(bytes)?;
        lock.flush()
    }
}

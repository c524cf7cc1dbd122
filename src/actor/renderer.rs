//! Render Worker: drains event batches and keeps the screen in step.
//!
//! The worker is an explicit state machine driven by [`RenderWorker::step`].
//! It owns the [`Editor`] exclusively; the only shared state it touches is
//! the queue and the two flags behind its [`RenderTransport`].

use super::messages::InputEvent;
use super::transport::RenderTransport;
use crate::buffer::Redraw;
use crate::editor::{Applied, Editor};
use crate::error::{Error, Result};
use crate::terminal::{OutputBuffer, Screen};
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

/// Timing knobs for the render worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Sleep while idle or waiting for a resize to settle.
    pub idle_sleep: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            idle_sleep: Duration::from_millis(3),
        }
    }
}

/// Render state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Waiting for work.
    Idle,
    /// Terminal is being resized; no events are applied.
    Resizing,
    /// Applying one event from the current batch.
    ApplyingEvent(InputEvent),
    /// Full reflow against the current width.
    Rewrapping,
    /// Exit was requested.
    Exited,
}

/// Render worker state.
pub struct RenderWorker<S, T> {
    editor: Editor,
    screen: S,
    transport: T,
    config: RenderConfig,
    /// Remaining events of the batch being applied.
    pending: VecDeque<InputEvent>,
    output: OutputBuffer,
    /// Width of the last draw.
    drawn_width: Option<usize>,
}

impl<S: Screen, T: RenderTransport> RenderWorker<S, T> {
    /// Create a worker drawing `editor` onto `screen`.
    pub fn new(editor: Editor, screen: S, transport: T, config: RenderConfig) -> Self {
        Self {
            editor,
            screen,
            transport,
            config,
            pending: VecDeque::new(),
            output: OutputBuffer::new(),
            drawn_width: None,
        }
    }

    /// The editor being rendered.
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Run until exit is requested or a step fails.
    ///
    /// On failure the exit flag is raised and a diagnostic line is written
    /// before the error is returned.
    pub fn run(mut self) -> Result<()> {
        tracing::info!("render worker started");

        let mut state = RenderState::Idle;
        loop {
            match self.step(state) {
                Ok(RenderState::Exited) => break,
                Ok(next) => state = next,
                Err(e) => {
                    tracing::error!(error = %e, "render worker failed");
                    self.transport.request_exit();
                    self.report(&e);
                    return Err(e);
                }
            }
        }

        self.screen.write_all(b"\r\n")?;
        tracing::info!("render worker stopped");
        Ok(())
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self, state: RenderState) -> Result<RenderState> {
        if self.transport.exit_requested() {
            return Ok(RenderState::Exited);
        }

        match state {
            RenderState::Idle => {
                if self.transport.is_resizing() {
                    return Ok(RenderState::Resizing);
                }
                // A resize shorter than one idle sleep never shows the flag.
                let width = self.screen.width()?;
                if self.drawn_width.is_some_and(|drawn| drawn != width) {
                    return Ok(RenderState::Rewrapping);
                }
                if let Some(event) = self.next_event() {
                    return Ok(RenderState::ApplyingEvent(event));
                }
                thread::sleep(self.config.idle_sleep);
                Ok(RenderState::Idle)
            }
            RenderState::Resizing => {
                if self.transport.is_resizing() {
                    thread::sleep(self.config.idle_sleep);
                    return Ok(RenderState::Resizing);
                }
                tracing::debug!("resize settled");
                Ok(RenderState::Rewrapping)
            }
            RenderState::ApplyingEvent(event) => {
                let width = self.screen.width()?;
                self.drawn_width = Some(width);
                match self.editor.apply(event, width)? {
                    Applied::Drawn(redraws) => {
                        for redraw in &redraws {
                            self.draw(redraw)?;
                        }
                        Ok(RenderState::Idle)
                    }
                    Applied::NeedsRewrap => Ok(RenderState::Rewrapping),
                    Applied::Ignored => Ok(RenderState::Idle),
                }
            }
            RenderState::Rewrapping => {
                let width = self.screen.width()?;
                self.drawn_width = Some(width);
                let redraw = self.editor.rewrap(width);
                self.draw(&redraw)?;
                Ok(RenderState::Idle)
            }
            RenderState::Exited => Ok(RenderState::Exited),
        }
    }

    /// Next event of the current batch, pulling a new batch when it is spent.
    fn next_event(&mut self) -> Option<InputEvent> {
        if self.pending.is_empty() {
            let batch = self.transport.pop_batch()?;
            tracing::trace!(events = batch.len(), "batch received");
            self.pending.extend(batch);
        }
        self.pending.pop_front()
    }

    fn draw(&mut self, redraw: &Redraw) -> Result<()> {
        self.output.clear();
        self.output.redraw(redraw);
        self.screen.write_all(self.output.as_bytes())?;
        Ok(())
    }

    fn report(&mut self, error: &Error) {
        self.output.clear();
        self.output.write_str("\r\n");
        self.output.write_str(&error.to_string());
        self.output.write_str("\r\n");
        if let Err(e) = self.screen.write_all(self.output.as_bytes()) {
            tracing::warn!(error = %e, "could not write diagnostic");
        }
    }
}

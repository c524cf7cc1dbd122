//! Engine: wires the two workers together and owns their lifetimes.
//!
//! The Engine is the entry point for hosts. It reserves screen space,
//! creates the shared signals and the queue, spawns the capture and render
//! threads and reports the first failure once both have stopped.

use super::input::{CaptureConfig, CaptureWorker};
use super::renderer::{RenderConfig, RenderWorker};
use super::signals::{ExitOnDrop, Signals};
use super::transport::channel;
use crate::command::{CommandExtension, CommandTable, NoExtension};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::terminal::{CrosstermKeys, CrosstermScreen, KeySource, OutputBuffer, RawModeGuard, Screen};
use std::any::Any;
use std::thread::{self, JoinHandle};

/// Configuration for the Engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capture worker timing.
    pub capture: CaptureConfig,
    /// Render worker timing.
    pub render: RenderConfig,
    /// Blank rows pushed below the cursor before the first draw.
    pub reserve_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            render: RenderConfig::default(),
            reserve_rows: 20,
        }
    }
}

/// The text input engine.
pub struct Engine {
    config: EngineConfig,
    editor: Editor,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), CommandTable::default(), Box::new(NoExtension))
    }
}

impl Engine {
    /// Create an engine resolving slash commands against `table`.
    pub fn new(
        config: EngineConfig,
        table: CommandTable,
        extension: Box<dyn CommandExtension>,
    ) -> Self {
        Self {
            config,
            editor: Editor::with_commands(table, extension),
        }
    }

    /// Run on the controlling terminal until the user quits.
    ///
    /// Raw mode is held for the whole session and released on every way out.
    ///
    /// # Errors
    ///
    /// Returns the first error either worker stopped with.
    pub fn run(self) -> Result<()> {
        let _raw = RawModeGuard::acquire()?;
        self.run_with(CrosstermKeys, CrosstermScreen::new())
    }

    /// Run against any key source and screen.
    ///
    /// # Errors
    ///
    /// Returns the first error either worker stopped with, or
    /// [`Error::Worker`] if a worker thread panicked.
    pub fn run_with<K, S>(self, keys: K, mut screen: S) -> Result<()>
    where
        K: KeySource + Send + 'static,
        S: Screen + Send + 'static,
    {
        let Self { config, editor } = self;

        let mut output = OutputBuffer::new();
        output.reserve_rows(config.reserve_rows);
        screen.write_all(output.as_bytes())?;

        let signals = Signals::new();
        let (capture_end, render_end) = channel(&signals);

        let capture = {
            let guard = ExitOnDrop::new(signals.clone());
            thread::Builder::new()
                .name("slate-capture".into())
                .spawn(move || {
                    let _guard = guard;
                    CaptureWorker::new(keys, capture_end, config.capture)?.run()
                })?
        };

        let render = {
            let guard = ExitOnDrop::new(signals.clone());
            let spawned = thread::Builder::new()
                .name("slate-render".into())
                .spawn(move || {
                    let _guard = guard;
                    RenderWorker::new(editor, screen, render_end, config.render).run()
                });
            match spawned {
                Ok(handle) => handle,
                Err(e) => {
                    signals.request_exit();
                    let _ = join(capture);
                    return Err(e.into());
                }
            }
        };

        tracing::info!("workers started");
        let captured = join(capture);
        let rendered = join(render);
        tracing::info!("workers stopped");

        match (captured, rendered) {
            // The capture side only sees a closed queue after the render
            // worker died; report the render worker's failure instead.
            (Err(Error::QueueClosed), Err(e)) => Err(e),
            (captured, rendered) => captured.and(rendered),
        }
    }
}

fn join(handle: JoinHandle<Result<()>>) -> Result<()> {
    let name = handle.thread().name().unwrap_or("worker").to_string();
    handle
        .join()
        .map_err(|payload| Error::Worker(format!("{name} panicked: {}", panic_message(&*payload))))?
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

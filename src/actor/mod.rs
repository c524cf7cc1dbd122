//! Workers: two threads joined by a batch queue and two shared flags.
//!
//! - **Capture Worker**: reads keys, watches the terminal size, flushes
//!   batches of events
//! - **Render Worker**: applies events to the buffer and redraws
//! - **Engine**: reserves the screen, spawns both, joins both
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐    EventBatch     ┌────────────────┐
//! │ Capture Thread │ ────────────────▶ │ Render Thread  │
//! └────────────────┘                   └────────────────┘
//!         │                                    │
//!         │ set resizing       read resizing   │
//!         │ request exit       request exit    │
//!         ▼                                    ▼
//!       ┌──────────────────────────────────────────┐
//!       │                 Signals                  │
//!       └──────────────────────────────────────────┘
//! ```
//!
//! Either worker raises the exit flag when it stops for any reason, so the
//! other one always winds down too.

mod engine;
mod input;
mod messages;
mod renderer;
mod signals;
mod transport;

pub use engine::{Engine, EngineConfig};
pub use input::{CaptureConfig, CaptureWorker};
pub use messages::{EventBatch, InputEvent, Outcome};
pub use renderer::{RenderConfig, RenderState, RenderWorker};
pub use signals::{ExitOnDrop, Signals};
pub use transport::{channel, CaptureEnd, CaptureTransport, RenderEnd, RenderTransport};

//! Transports: how the workers reach the queue and the shared signals.
//!
//! Each worker receives its end of the transport at construction instead of
//! touching channels or flags directly, so tests can drive a worker from a
//! single thread.

use super::messages::EventBatch;
use super::signals::Signals;
use crate::error::{Error, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

/// Capture side: sole producer of batches.
pub trait CaptureTransport: Send {
    /// Enqueue a batch.
    fn push_batch(&self, batch: EventBatch) -> Result<()>;
    /// Batches waiting to be rendered.
    fn queue_depth(&self) -> usize;
    /// Whether shutdown was requested.
    fn exit_requested(&self) -> bool;
    /// Ask both workers to stop.
    fn request_exit(&self);
    /// Raise or clear the resizing flag.
    fn set_resizing(&self, resizing: bool);
}

/// Render side: sole consumer of batches.
pub trait RenderTransport: Send {
    /// Take the oldest batch without blocking.
    fn pop_batch(&self) -> Option<EventBatch>;
    /// Whether shutdown was requested.
    fn exit_requested(&self) -> bool;
    /// Ask both workers to stop.
    fn request_exit(&self);
    /// Whether the terminal is being resized.
    fn is_resizing(&self) -> bool;
}

/// Capture end of an in-process channel transport.
#[derive(Debug, Clone)]
pub struct CaptureEnd {
    tx: Sender<EventBatch>,
    signals: Signals,
}

/// Render end of an in-process channel transport.
#[derive(Debug, Clone)]
pub struct RenderEnd {
    rx: Receiver<EventBatch>,
    signals: Signals,
}

/// Create a connected pair of transport ends over an unbounded queue.
pub fn channel(signals: &Signals) -> (CaptureEnd, RenderEnd) {
    let (tx, rx) = unbounded();
    (
        CaptureEnd {
            tx,
            signals: signals.clone(),
        },
        RenderEnd {
            rx,
            signals: signals.clone(),
        },
    )
}

impl CaptureTransport for CaptureEnd {
    fn push_batch(&self, batch: EventBatch) -> Result<()> {
        self.tx.send(batch).map_err(|_| Error::QueueClosed)
    }

    fn queue_depth(&self) -> usize {
        self.tx.len()
    }

    fn exit_requested(&self) -> bool {
        self.signals.exit_requested()
    }

    fn request_exit(&self) {
        self.signals.request_exit();
    }

    fn set_resizing(&self, resizing: bool) {
        self.signals.set_resizing(resizing);
    }
}

impl RenderTransport for RenderEnd {
    fn pop_batch(&self) -> Option<EventBatch> {
        match self.rx.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    fn exit_requested(&self) -> bool {
        self.signals.exit_requested()
    }

    fn request_exit(&self) {
        self.signals.request_exit();
    }

    fn is_resizing(&self) -> bool {
        self.signals.is_resizing()
    }
}

//! Capture Worker: reads raw keys and feeds batches to the render worker.
//!
//! Each iteration either notices a size change (raising the resizing flag
//! and skipping the read) or performs one timed key read. Keys accumulate
//! into a pending batch that is flushed once the time spent reading since
//! the batch opened exceeds a threshold that grows with the render backlog.

use super::messages::{EventBatch, InputEvent, Outcome};
use super::transport::CaptureTransport;
use crate::error::Result;
use crate::terminal::KeySource;
use std::thread;
use std::time::{Duration, Instant};

/// Timing knobs for the capture worker.
///
/// Read time is wall-clock time measured around each key read, counted only
/// while a batch is open. A read that waits out `key_timeout` therefore
/// flushes on its own, while keys arriving back to back (a paste, fast
/// typing) share a batch until `flush_base` of reading has passed. The flush
/// durations are sized against `key_timeout` for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// How long one key read may wait.
    pub key_timeout: Duration,
    /// Pause after a size change before reading again.
    pub resize_debounce: Duration,
    /// Flush threshold with an empty queue.
    pub flush_base: Duration,
    /// Extra flush threshold per batch already queued.
    pub flush_per_queued: Duration,
    /// Iterations between queue-depth samples.
    pub depth_sample_interval: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            key_timeout: Duration::from_millis(5),
            resize_debounce: Duration::from_millis(50),
            flush_base: Duration::from_millis(2),
            flush_per_queued: Duration::from_millis(1),
            depth_sample_interval: 1000,
        }
    }
}

/// Capture worker state.
pub struct CaptureWorker<K, T> {
    keys: K,
    transport: T,
    config: CaptureConfig,
    /// Last observed `(columns, rows)`.
    observed: (u16, u16),
    /// Keys read but not yet sent.
    pending: EventBatch,
    /// Read time accumulated since the pending batch opened.
    elapsed: Duration,
    /// Current flush threshold.
    threshold: Duration,
    iteration: u64,
}

impl<K: KeySource, T: CaptureTransport> CaptureWorker<K, T> {
    /// Create a worker reading from `keys` and pushing into `transport`.
    pub fn new(keys: K, transport: T, config: CaptureConfig) -> Result<Self> {
        let observed = keys.size()?;
        Ok(Self {
            keys,
            transport,
            config,
            observed,
            pending: Vec::new(),
            elapsed: Duration::ZERO,
            threshold: config.flush_base,
            iteration: 0,
        })
    }

    /// Run until a terminate key is read or exit is requested elsewhere.
    ///
    /// The exit flag is raised on every way out, including errors, so the
    /// render worker never waits on a dead capture worker.
    pub fn run(mut self) -> Result<()> {
        tracing::info!("capture worker started");

        while !self.transport.exit_requested() {
            match self.step() {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Terminate) => {
                    tracing::info!("terminate key read");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "capture worker failed");
                    self.transport.request_exit();
                    return Err(e);
                }
            }
        }

        self.transport.request_exit();
        tracing::info!("capture worker stopped");
        Ok(())
    }

    /// One iteration: resize check, or one timed read plus a possible flush.
    pub fn step(&mut self) -> Result<Outcome> {
        let size = self.keys.size()?;
        if size != self.observed {
            tracing::debug!(from = ?self.observed, to = ?size, "terminal resized");
            self.transport.set_resizing(true);
            self.observed = size;
            thread::sleep(self.config.resize_debounce);
            return Ok(Outcome::Continue);
        }
        self.transport.set_resizing(false);

        let start = Instant::now();
        match self.keys.read_key(self.config.key_timeout)? {
            Some(event) if event.is_terminate() => return Ok(Outcome::Terminate),
            Some(event) => self.pending.push(event),
            None => {}
        }
        if !self.pending.is_empty() {
            self.elapsed += start.elapsed();
        }

        if self.iteration % self.config.depth_sample_interval.max(1) == 0 {
            self.threshold = self.flush_threshold(self.transport.queue_depth());
        }
        self.iteration += 1;

        if self.elapsed > self.threshold && !self.pending.is_empty() {
            let batch = std::mem::take(&mut self.pending);
            tracing::trace!(events = batch.len(), "flushing batch");
            self.transport.push_batch(batch)?;
            self.elapsed = Duration::ZERO;
        }
        Ok(Outcome::Continue)
    }

    /// Flush threshold for a queue holding `depth` batches.
    fn flush_threshold(&self, depth: usize) -> Duration {
        let depth = u32::try_from(depth).unwrap_or(u32::MAX);
        self.config
            .flush_base
            .saturating_add(self.config.flush_per_queued.saturating_mul(depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::signals::Signals;
    use crate::actor::transport::{channel, RenderTransport};
    use crate::error::Error;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::io;

    enum Scripted {
        Key(InputEvent),
        /// A read that times out.
        Nothing,
        Resize(u16, u16),
        Fail,
    }

    struct ScriptedKeys {
        size: Cell<(u16, u16)>,
        script: VecDeque<Scripted>,
    }

    impl ScriptedKeys {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                size: Cell::new((80, 24)),
                script: script.into(),
            }
        }
    }

    impl KeySource for ScriptedKeys {
        fn size(&self) -> io::Result<(u16, u16)> {
            Ok(self.size.get())
        }

        fn read_key(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
            // Stand in for the time a real read spends waiting.
            thread::sleep(Duration::from_millis(1));
            match self.script.pop_front() {
                Some(Scripted::Key(event)) => Ok(Some(event)),
                Some(Scripted::Nothing) => Ok(None),
                Some(Scripted::Resize(cols, rows)) => {
                    self.size.set((cols, rows));
                    Ok(None)
                }
                Some(Scripted::Fail) => Err(io::Error::new(io::ErrorKind::Other, "tty gone")),
                None => Ok(Some(InputEvent::Interrupt)),
            }
        }
    }

    fn config() -> CaptureConfig {
        CaptureConfig {
            resize_debounce: Duration::from_millis(1),
            flush_base: Duration::from_micros(500),
            ..CaptureConfig::default()
        }
    }

    fn drain(render: &impl RenderTransport) -> Vec<InputEvent> {
        std::iter::from_fn(|| render.pop_batch()).flatten().collect()
    }

    #[test]
    fn test_keys_reach_queue_in_order() {
        let signals = Signals::new();
        let (capture, render) = channel(&signals);
        let keys = ScriptedKeys::new(vec![
            Scripted::Key(InputEvent::Char('h')),
            Scripted::Key(InputEvent::Char('i')),
            Scripted::Key(InputEvent::Enter),
        ]);

        CaptureWorker::new(keys, capture, config()).unwrap().run().unwrap();

        assert!(signals.exit_requested());
        assert_eq!(
            drain(&render),
            vec![InputEvent::Char('h'), InputEvent::Char('i'), InputEvent::Enter]
        );
    }

    #[test]
    fn test_escape_terminates() {
        let signals = Signals::new();
        let (capture, render) = channel(&signals);
        let keys = ScriptedKeys::new(vec![
            Scripted::Key(InputEvent::Escape),
            Scripted::Key(InputEvent::Char('x')),
        ]);

        CaptureWorker::new(keys, capture, config()).unwrap().run().unwrap();

        assert!(signals.exit_requested());
        assert!(drain(&render).is_empty());
    }

    #[test]
    fn test_resize_raises_and_clears_flag() {
        let signals = Signals::new();
        let (capture, _render) = channel(&signals);
        let keys = ScriptedKeys::new(vec![
            Scripted::Resize(100, 40),
            Scripted::Key(InputEvent::Char('a')),
        ]);
        let mut worker = CaptureWorker::new(keys, capture, config()).unwrap();

        worker.step().unwrap();
        assert!(!signals.is_resizing());

        // Size change: flag raised, no key read this iteration.
        worker.step().unwrap();
        assert!(signals.is_resizing());
        assert!(worker.pending.is_empty());

        worker.step().unwrap();
        assert!(!signals.is_resizing());
    }

    #[test]
    fn test_failure_requests_exit() {
        let signals = Signals::new();
        let (capture, _render) = channel(&signals);
        let keys = ScriptedKeys::new(vec![Scripted::Fail]);

        let result = CaptureWorker::new(keys, capture, config()).unwrap().run();

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(signals.exit_requested());
    }

    #[test]
    fn test_stops_when_exit_requested_elsewhere() {
        let signals = Signals::new();
        let (capture, _render) = channel(&signals);
        signals.request_exit();

        let keys = ScriptedKeys::new(vec![Scripted::Fail]);
        assert!(CaptureWorker::new(keys, capture, config()).unwrap().run().is_ok());
    }

    #[test]
    fn test_threshold_grows_with_backlog() {
        let signals = Signals::new();
        let (capture, _render) = channel(&signals);
        let keys = ScriptedKeys::new(Vec::new());
        let worker = CaptureWorker::new(keys, capture, CaptureConfig::default()).unwrap();

        assert_eq!(worker.flush_threshold(0), Duration::from_millis(2));
        assert_eq!(worker.flush_threshold(3), Duration::from_millis(5));
    }

    #[test]
    fn test_quick_keys_share_a_batch() {
        let signals = Signals::new();
        let (capture, render) = channel(&signals);
        let mut script: Vec<Scripted> = (0..30).map(|_| Scripted::Nothing).collect();
        script.extend("abc".chars().map(|c| Scripted::Key(InputEvent::Char(c))));
        script.extend((0..30).map(|_| Scripted::Nothing));
        let config = CaptureConfig {
            flush_base: Duration::from_millis(20),
            ..config()
        };

        CaptureWorker::new(ScriptedKeys::new(script), capture, config)
            .unwrap()
            .run()
            .unwrap();

        // Idle reads before the first key do not count toward the flush.
        assert_eq!(
            render.pop_batch(),
            Some(vec![
                InputEvent::Char('a'),
                InputEvent::Char('b'),
                InputEvent::Char('c')
            ])
        );
    }
}

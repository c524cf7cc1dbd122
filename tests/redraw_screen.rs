//! Redraw output replayed through a terminal emulator.
//!
//! Every byte the render worker writes goes into a `vt100::Parser`. After
//! each phase of the session the emulated screen must show exactly the
//! buffer's lines below the banner, with the cursor on the last of them.

use slate::actor::{
    channel, CaptureEnd, CaptureTransport, RenderEnd, RenderState, RenderWorker, Signals,
};
use slate::terminal::Screen;
use slate::{Editor, InputEvent, RenderConfig};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ROWS: u16 = 40;
const BANNER: &[&str] = &["banner one", "banner two"];

#[derive(Clone)]
struct EmulatedScreen {
    parser: Arc<Mutex<vt100::Parser>>,
}

impl EmulatedScreen {
    fn new(cols: u16) -> Self {
        let mut parser = vt100::Parser::new(ROWS, cols, 0);
        for line in BANNER {
            parser.process(line.as_bytes());
            parser.process(b"\r\n");
        }
        Self {
            parser: Arc::new(Mutex::new(parser)),
        }
    }

    fn set_width(&self, cols: u16) {
        self.parser.lock().unwrap().set_size(ROWS, cols);
    }

    fn rows(&self) -> Vec<String> {
        let parser = self.parser.lock().unwrap();
        let (_, cols) = parser.screen().size();
        parser.screen().rows(0, cols).collect()
    }

    fn cursor_row(&self) -> usize {
        usize::from(self.parser.lock().unwrap().screen().cursor_position().0)
    }
}

impl Screen for EmulatedScreen {
    fn width(&self) -> io::Result<usize> {
        Ok(usize::from(self.parser.lock().unwrap().screen().size().1))
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.parser.lock().unwrap().process(bytes);
        Ok(())
    }
}

type Worker = RenderWorker<EmulatedScreen, RenderEnd>;

fn session(cols: u16) -> (Worker, CaptureEnd, EmulatedScreen) {
    let signals = Signals::new();
    let (capture, render) = channel(&signals);
    let screen = EmulatedScreen::new(cols);
    let config = RenderConfig {
        idle_sleep: Duration::from_micros(100),
    };
    let worker = RenderWorker::new(Editor::new(), screen.clone(), render, config);
    (worker, capture, screen)
}

fn chars(text: &str) -> Vec<InputEvent> {
    text.chars().map(InputEvent::Char).collect()
}

/// Step until an idle step stays idle.
fn settle(worker: &mut Worker) {
    let mut state = RenderState::Idle;
    for _ in 0..10_000 {
        let next = worker.step(state).unwrap();
        if state == RenderState::Idle && next == RenderState::Idle {
            return;
        }
        state = next;
    }
    panic!("worker never settled");
}

fn send(worker: &mut Worker, capture: &CaptureEnd, batch: Vec<InputEvent>) {
    capture.push_batch(batch).unwrap();
    settle(worker);
}

/// The screen below the banner holds exactly the buffer's lines.
fn assert_screen_matches(worker: &Worker, screen: &EmulatedScreen) {
    let lines = worker.editor().buffer().lines();
    let rows = screen.rows();
    let start = BANNER.len();

    for (row, banner) in rows.iter().zip(BANNER) {
        assert_eq!(row.trim_end(), *banner);
    }
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(
            rows[start + i].trim_end(),
            line.trim_end(),
            "row {} differs; buffer {lines:?}, screen {rows:?}",
            start + i
        );
    }
    for (i, row) in rows.iter().enumerate().skip(start + lines.len()) {
        assert!(row.trim_end().is_empty(), "stale row {i}: {row:?}");
    }
    assert_eq!(screen.cursor_row(), start + lines.len() - 1);
}

#[test]
fn test_typing_and_enter_match_screen() {
    let (mut worker, capture, screen) = session(10);

    send(&mut worker, &capture, chars("hello world"));
    assert_eq!(worker.editor().buffer().lines(), ["hello ", "world"]);
    assert_screen_matches(&worker, &screen);

    send(&mut worker, &capture, vec![InputEvent::Enter]);
    assert_screen_matches(&worker, &screen);

    send(&mut worker, &capture, chars("a\tbcdefgh"));
    assert_screen_matches(&worker, &screen);
}

#[test]
fn test_session_keeps_screen_in_step() {
    let (mut worker, capture, screen) = session(10);

    send(&mut worker, &capture, chars("hello world"));
    send(&mut worker, &capture, vec![InputEvent::Enter]);
    send(&mut worker, &capture, chars("a\tbcdefgh"));
    assert_screen_matches(&worker, &screen);

    // Back over the wrapped second paragraph one key at a time.
    for _ in 0.."a       bcdefgh".len() {
        send(&mut worker, &capture, vec![InputEvent::Backspace]);
        assert_screen_matches(&worker, &screen);
    }

    // Undo the Enter.
    send(&mut worker, &capture, vec![InputEvent::Backspace]);
    assert!(worker.editor().buffer().boundaries().is_empty());
    assert_screen_matches(&worker, &screen);

    screen.set_width(20);
    settle(&mut worker);
    assert_eq!(worker.editor().buffer().lines(), ["hello world"]);
    assert_screen_matches(&worker, &screen);

    send(&mut worker, &capture, chars("\\help"));
    assert_screen_matches(&worker, &screen);

    send(&mut worker, &capture, chars("\\clr"));
    assert_eq!(worker.editor().buffer().lines(), [""]);
    assert_screen_matches(&worker, &screen);
}

#[test]
fn test_batch_with_mixed_keys_matches_screen() {
    let (mut worker, capture, screen) = session(12);

    let mut batch = chars("one two three four");
    batch.push(InputEvent::Enter);
    batch.extend(chars("five"));
    batch.push(InputEvent::Backspace);
    batch.push(InputEvent::Backspace);
    batch.extend(chars("x\ty"));
    send(&mut worker, &capture, batch);

    assert_screen_matches(&worker, &screen);
}

//! Engine tests against a scripted keyboard and a recording screen.
//!
//! Both workers run on real threads; the scripts leave idle reads between
//! phases so the render worker catches up before the next one starts.

use slate::command::{CommandEntry, CommandTable, ExtensionError, ExtensionResult, MergePolicy};
use slate::terminal::{KeySource, Screen};
use slate::{CaptureConfig, Engine, EngineConfig, Error, InputEvent, NoExtension};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

enum Step {
    Key(InputEvent),
    /// This many empty reads.
    Idle(u32),
    /// Change the terminal width.
    Resize(u16),
    Fail,
}

struct ScriptedKeys {
    width: Arc<AtomicU16>,
    script: VecDeque<Step>,
}

impl KeySource for ScriptedKeys {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width.load(Ordering::SeqCst), 24))
    }

    fn read_key(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        thread::sleep(Duration::from_millis(1));
        match self.script.front_mut() {
            Some(Step::Key(event)) => {
                let event = *event;
                self.script.pop_front();
                Ok(Some(event))
            }
            Some(Step::Idle(remaining)) => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.script.pop_front();
                }
                Ok(None)
            }
            Some(Step::Resize(width)) => {
                self.width.store(*width, Ordering::SeqCst);
                self.script.pop_front();
                Ok(None)
            }
            Some(Step::Fail) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "keyboard gone")),
            None => Ok(None),
        }
    }
}

#[derive(Clone)]
struct RecordingScreen {
    width: Arc<AtomicU16>,
    written: Arc<Mutex<Vec<u8>>>,
}

impl RecordingScreen {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.written.lock().unwrap()).into_owned()
    }
}

impl Screen for RecordingScreen {
    fn width(&self) -> io::Result<usize> {
        Ok(usize::from(self.width.load(Ordering::SeqCst)))
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }
}

fn terminal(width: u16, script: Vec<Step>) -> (ScriptedKeys, RecordingScreen) {
    let width = Arc::new(AtomicU16::new(width));
    let keys = ScriptedKeys {
        width: Arc::clone(&width),
        script: script.into(),
    };
    let screen = RecordingScreen {
        width,
        written: Arc::default(),
    };
    (keys, screen)
}

fn typed(text: &str) -> impl Iterator<Item = Step> + '_ {
    text.chars().map(|c| Step::Key(InputEvent::Char(c)))
}

fn config() -> EngineConfig {
    EngineConfig {
        capture: CaptureConfig {
            resize_debounce: Duration::from_millis(1),
            ..CaptureConfig::default()
        },
        reserve_rows: 2,
        ..EngineConfig::default()
    }
}

fn engine() -> Engine {
    Engine::new(config(), CommandTable::default(), Box::new(NoExtension))
}

#[test]
fn test_session_types_and_quits() {
    let mut script: Vec<Step> = typed("hello world").collect();
    script.push(Step::Key(InputEvent::Enter));
    script.push(Step::Idle(100));
    script.push(Step::Key(InputEvent::Interrupt));
    let (keys, screen) = terminal(10, script);

    engine().run_with(keys, screen.clone()).unwrap();

    let text = screen.text();
    assert!(text.starts_with("\n\n\r\x1b[2A"));
    assert!(text.contains("hello \n\rworld\n\r"));
    assert!(text.ends_with("\r\n"));
}

#[test]
fn test_escape_quits_without_error() {
    let (keys, screen) = terminal(80, vec![Step::Key(InputEvent::Escape)]);
    assert!(Engine::default().run_with(keys, screen.clone()).is_ok());
    assert!(screen.text().starts_with(&"\n".repeat(20)));
}

#[test]
fn test_resize_rewraps_to_new_width() {
    let mut script: Vec<Step> = typed("hello world").collect();
    script.push(Step::Idle(100));
    script.push(Step::Resize(40));
    script.push(Step::Idle(100));
    script.push(Step::Key(InputEvent::Eof));
    let (keys, screen) = terminal(10, script);

    engine().run_with(keys, screen.clone()).unwrap();

    let text = screen.text();
    let before_resize = text.find("hello \n\rworld").unwrap();
    let after_resize = text.rfind("hello world").unwrap();
    assert!(after_resize > before_resize);
}

#[test]
fn test_extension_failure_is_reported() {
    let table = CommandTable::merged(
        vec![("boom".to_string(), CommandEntry::control(7, "Always fails"))],
        MergePolicy::default(),
    )
    .unwrap();
    let failing = |_code: i32, _lines: Vec<String>, _boundaries: Vec<usize>| -> ExtensionResult {
        Err(ExtensionError::Failed("bad arithmetic".to_string()))
    };
    let (keys, screen) = terminal(80, typed("\\boom").collect());

    let result = Engine::new(config(), table, Box::new(failing)).run_with(keys, screen.clone());

    match result {
        Err(Error::ExternalCommand { code, reason }) => {
            assert_eq!(code, 7);
            assert_eq!(reason, "bad arithmetic");
        }
        other => panic!("expected external command failure, got {other:?}"),
    }
    assert!(screen.text().contains("bad arithmetic"));
}

#[test]
fn test_extension_panic_is_reported() {
    let table = CommandTable::merged(
        vec![("boom".to_string(), CommandEntry::control(9, "Panics"))],
        MergePolicy::default(),
    )
    .unwrap();
    let panicking = |_code: i32, _lines: Vec<String>, _boundaries: Vec<usize>| -> ExtensionResult {
        panic!("extension exploded")
    };
    let (keys, screen) = terminal(80, typed("\\boom").collect());

    let result = Engine::new(config(), table, Box::new(panicking)).run_with(keys, screen);

    assert!(matches!(result, Err(Error::ExternalCommand { code: 9, .. })));
}

#[test]
fn test_keyboard_failure_stops_both_workers() {
    let mut script: Vec<Step> = typed("abc").collect();
    script.push(Step::Fail);
    let (keys, screen) = terminal(80, script);

    let result = engine().run_with(keys, screen);

    assert!(matches!(result, Err(Error::Io(_))));
}

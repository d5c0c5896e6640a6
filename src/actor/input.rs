//! Input Actor: Dedicated thread for polling terminal events.
//!
//! Polls crossterm with a timeout so the shutdown flag is checked regularly,
//! converts events into [`InputEvent`]s and forwards them over a bounded
//! channel.

use super::messages::{InputEvent, KeyCode, KeyInput, KeyModifiers, MouseInput, MouseKind};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("tmail-input".to_string())
            .spawn(move || run_loop(&sender, &flag, poll_timeout))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the thread and wait for it.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
    while !shutdown.load(Ordering::Relaxed) {
        let next = match event::poll(poll_timeout) {
            Ok(true) => event::read().map(convert_event),
            Ok(false) => continue,
            Err(e) => Err(e),
        };
        let forwarded = match next {
            Ok(Some(input)) => sender.send(input),
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(error = %e, "terminal event read failed");
                let _ = sender.send(InputEvent::Error(e.to_string()));
                break;
            }
        };
        if forwarded.is_err() {
            // UI loop is gone.
            break;
        }
    }
    tracing::debug!("input actor stopped");
}

/// Convert a crossterm event to an [`InputEvent`].
pub fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            Some(InputEvent::Key(KeyInput {
                code: convert_key_code(key.code)?,
                modifiers: convert_modifiers(key.modifiers),
            }))
        }
        Event::Mouse(mouse) => {
            let kind = match mouse.kind {
                event::MouseEventKind::ScrollUp => MouseKind::ScrollUp,
                event::MouseEventKind::ScrollDown => MouseKind::ScrollDown,
                event::MouseEventKind::Down(event::MouseButton::Left) => MouseKind::LeftClick,
                _ => return None,
            };
            Some(InputEvent::Mouse(MouseInput {
                kind,
                x: mouse.column,
                y: mouse.row,
            }))
        }
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => None,
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    })
}

const fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};

    #[test]
    fn test_convert_ctrl_c() {
        let key = KeyEvent::new(event::KeyCode::Char('c'), event::KeyModifiers::CONTROL);
        let converted = convert_event(Event::Key(key));
        assert_eq!(
            converted,
            Some(InputEvent::Key(KeyInput {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            }))
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = KeyEvent::new(event::KeyCode::Char('q'), event::KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(convert_event(Event::Key(key)), None);
    }

    #[test]
    fn test_unhandled_key_ignored() {
        let key = KeyEvent::new(event::KeyCode::F(5), event::KeyModifiers::NONE);
        assert_eq!(convert_event(Event::Key(key)), None);
    }

    #[test]
    fn test_convert_mouse_wheel() {
        let mouse = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 12,
            row: 7,
            modifiers: event::KeyModifiers::NONE,
        };
        assert_eq!(
            convert_event(Event::Mouse(mouse)),
            Some(InputEvent::Mouse(MouseInput {
                kind: MouseKind::ScrollDown,
                x: 12,
                y: 7,
            }))
        );
    }

    #[test]
    fn test_convert_resize() {
        assert_eq!(
            convert_event(Event::Resize(120, 40)),
            Some(InputEvent::Resize {
                width: 120,
                height: 40
            })
        );
    }
}

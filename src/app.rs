//! The foreground loop: owns the view state and wires the actors, the mail
//! stream and the timers together.
//!
//! Every wake-up of the loop becomes exactly one [`AppEvent`]; after it is
//! applied, a fresh frame is rendered and handed to the render actor.

use crate::actor::{InputActor, InputEvent, RenderCommand, RendererActor, Terminal, TerminalConfig};
use crate::buffer::Buffer;
use crate::error::Result;
use crate::mail::Message;
use crate::sync::{CancelToken, MailStream};
use crate::ui::{self, AppEvent, Command, Theme, ViewState};
use chrono::Local;
use crossbeam_channel::{after, bounded, never, select, tick, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often the input actor checks its shutdown flag.
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(50);
/// Status bar clock period.
const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const INPUT_QUEUE: usize = 64;
const RENDER_QUEUE: usize = 16;

/// Options for [`run`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Shown in the status bar.
    pub poll_interval: Duration,
    /// Style table.
    pub theme: Theme,
    /// Terminal modes.
    pub terminal: TerminalConfig,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            theme: Theme::DEFAULT,
            terminal: TerminalConfig::default(),
        }
    }
}

/// View state plus the bookkeeping the loop needs to carry out
/// [`Command`]s.
pub struct App {
    state: ViewState,
    theme: Theme,
    /// Deadline and generation of the pending status expiry.
    expiry: Option<(Instant, u64)>,
    running: bool,
}

impl App {
    /// A fresh app in the loading state.
    pub fn new(poll_interval: Duration, theme: Theme) -> Self {
        Self {
            state: ViewState::new(poll_interval, Local::now()),
            theme,
            expiry: None,
            running: true,
        }
    }

    /// Apply one event and act on the resulting command.
    pub fn apply(&mut self, event: AppEvent) {
        match ui::update(&mut self.state, event) {
            Command::None => {}
            Command::Quit => self.running = false,
            Command::ExpireStatusAfter { after, generation } => {
                // A newer notice supersedes the pending one.
                self.expiry = Some((Instant::now() + after, generation));
            }
        }
    }

    /// Whether the loop should keep going.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The current view state.
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Render the current state.
    pub fn frame(&self) -> Option<Buffer> {
        ui::render(&self.state, &self.theme)
    }

    /// Timer that fires when the pending status expiry is due.
    pub fn expiry_timer(&self) -> Receiver<Instant> {
        match self.expiry {
            Some((deadline, _)) => after(deadline.saturating_duration_since(Instant::now())),
            None => never(),
        }
    }

    /// Take the pending expiry as an event.
    pub fn take_expiry(&mut self) -> Option<AppEvent> {
        self.expiry
            .take()
            .map(|(_, generation)| AppEvent::TempStatusExpired { generation })
    }
}

/// Map an input actor event into the UI's event type.
pub fn input_to_event(input: InputEvent) -> AppEvent {
    match input {
        InputEvent::Key(key) => AppEvent::Key(key),
        InputEvent::Mouse(mouse) => AppEvent::Mouse(mouse),
        InputEvent::Resize { width, height } => AppEvent::Resize { width, height },
        InputEvent::Error(message) => AppEvent::Error(message),
    }
}

enum Wake {
    Input(Option<InputEvent>),
    Mail(Option<Message>),
    Clock,
    Expiry,
    Cancelled,
}

/// Run the UI until the user quits or `cancel` fires.
///
/// Quitting raises `cancel`, so the synchronizer stops at its next
/// checkpoint. The terminal is restored before this returns.
pub fn run(stream: &MailStream, cancel: &CancelToken, options: &AppOptions) -> Result<()> {
    let terminal = Terminal::enter(options.terminal)?;
    let (width, height) = Terminal::size()?;

    let (input_tx, input_rx) = bounded(INPUT_QUEUE);
    let (render_tx, render_rx) = bounded(RENDER_QUEUE);
    let input = InputActor::spawn(input_tx, INPUT_POLL_TIMEOUT)?;
    let renderer = RendererActor::spawn(render_rx)?;
    info!(width, height, "ui started");

    let mut app = App::new(options.poll_interval, options.theme);
    app.apply(AppEvent::Resize { width, height });
    present(&app, &render_tx);

    event_loop(&mut app, &input_rx, stream, cancel, &render_tx);

    cancel.cancel();
    let _ = render_tx.send(RenderCommand::Shutdown);
    renderer.join();
    input.join();
    drop(terminal);
    info!("ui stopped");
    Ok(())
}

fn event_loop(
    app: &mut App,
    input_rx: &Receiver<InputEvent>,
    stream: &MailStream,
    cancel: &CancelToken,
    render_tx: &Sender<RenderCommand>,
) {
    let clock = tick(CLOCK_PERIOD);
    let mut input_rx = input_rx.clone();
    let mut mail_rx = stream.receiver().clone();

    while app.is_running() {
        let expiry = app.expiry_timer();
        let wake = select! {
            recv(input_rx) -> msg => Wake::Input(msg.ok()),
            recv(mail_rx) -> msg => Wake::Mail(msg.ok()),
            recv(clock) -> _ => Wake::Clock,
            recv(expiry) -> _ => Wake::Expiry,
            recv(cancel.receiver()) -> _ => Wake::Cancelled,
        };

        let event = match wake {
            Wake::Input(Some(input)) => input_to_event(input),
            Wake::Input(None) => {
                warn!("input actor gone");
                input_rx = never();
                continue;
            }
            Wake::Mail(Some(message)) => AppEvent::NewMessage(message),
            Wake::Mail(None) => {
                mail_rx = never();
                AppEvent::MonitorStopped
            }
            Wake::Clock => AppEvent::Tick(Local::now()),
            Wake::Expiry => match app.take_expiry() {
                Some(event) => event,
                None => continue,
            },
            Wake::Cancelled => {
                debug!("ui loop cancelled");
                break;
            }
        };

        app.apply(event);
        if !present(app, render_tx) {
            warn!("render actor gone, stopping");
            break;
        }
    }
}

/// Send the current frame to the render actor. `false` when it is gone.
fn present(app: &App, render_tx: &Sender<RenderCommand>) -> bool {
    match app.frame() {
        Some(frame) => render_tx.send(RenderCommand::Update(Box::new(frame))).is_ok(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{KeyCode, KeyInput};

    fn message(id: &str, cursor: i64) -> Message {
        Message {
            id: id.to_string(),
            cursor,
            subject: format!("subject {id}"),
            ..Message::default()
        }
    }

    #[test]
    fn test_quit_stops_app() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        assert!(app.is_running());
        app.apply(AppEvent::Key(KeyInput::plain(KeyCode::Char('q'))));
        assert!(!app.is_running());
    }

    #[test]
    fn test_no_frame_before_size() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        assert!(app.frame().is_none());
        app.apply(AppEvent::Resize { width: 80, height: 24 });
        let frame = app.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (80, 24));
    }

    #[test]
    fn test_expiry_scheduled_and_delivered() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        app.apply(AppEvent::Resize { width: 80, height: 24 });
        app.apply(AppEvent::NewMessage(message("a", 1)));
        assert!(app.take_expiry().is_none());

        app.apply(AppEvent::NewMessage(message("b", 2)));
        let Some(event) = app.take_expiry() else {
            panic!("no expiry scheduled");
        };
        assert!(app.take_expiry().is_none());
        app.apply(event);
        assert_eq!(app.state().status.kind, ui::StatusKind::Normal);
    }

    #[test]
    fn test_expiry_timer_fires() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        assert!(app
            .expiry_timer()
            .recv_timeout(Duration::from_millis(20))
            .is_err());

        app.expiry = Some((Instant::now(), 7));
        assert!(app
            .expiry_timer()
            .recv_timeout(Duration::from_millis(500))
            .is_ok());
        assert_eq!(
            app.take_expiry(),
            Some(AppEvent::TempStatusExpired { generation: 7 })
        );
    }

    #[test]
    fn test_input_mapping() {
        let key = KeyInput::plain(KeyCode::Enter);
        assert_eq!(input_to_event(InputEvent::Key(key)), AppEvent::Key(key));
        assert_eq!(
            input_to_event(InputEvent::Resize { width: 3, height: 4 }),
            AppEvent::Resize { width: 3, height: 4 }
        );
        assert_eq!(
            input_to_event(InputEvent::Error("tty".to_string())),
            AppEvent::Error("tty".to_string())
        );
    }

    #[test]
    fn test_event_loop_stops_on_cancel() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        let (_input_tx, input_rx) = bounded::<InputEvent>(1);
        let (_sink, stream) = crate::sync::mail_channel(1);
        let (render_tx, _render_rx) = bounded(16);
        let cancel = CancelToken::new();
        cancel.cancel();
        event_loop(&mut app, &input_rx, &stream, &cancel, &render_tx);
        assert!(app.is_running());
    }

    #[test]
    fn test_event_loop_reports_monitor_stop() {
        let mut app = App::new(Duration::from_secs(30), Theme::DEFAULT);
        app.apply(AppEvent::Resize { width: 80, height: 24 });
        let (input_tx, input_rx) = bounded::<InputEvent>(4);
        let (sink, stream) = crate::sync::mail_channel(4);
        let (render_tx, render_rx) = bounded(64);
        let cancel = CancelToken::new();

        let sync_cancel = cancel.clone();
        sink.send(message("a", 1), &sync_cancel).unwrap();
        drop(sink);
        input_tx
            .send(InputEvent::Key(KeyInput::plain(KeyCode::Char('x'))))
            .unwrap();

        // Let the loop drain mail and input, then quit through a key.
        let quitter = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            let _ = input_tx.send(InputEvent::Key(KeyInput::plain(KeyCode::Char('q'))));
        });
        event_loop(&mut app, &input_rx, &stream, &cancel, &render_tx);
        quitter.join().unwrap();

        assert!(!app.is_running());
        assert!(app.state().monitor_stopped);
        assert_eq!(app.state().messages.len(), 1);
        assert!(render_rx.try_iter().count() >= 3);
    }
}

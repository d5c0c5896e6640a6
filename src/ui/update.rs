//! The state transition function.
//!
//! [`update`] is the only place a [`ViewState`] changes. It never blocks and
//! never touches the terminal; timers it needs are requested through the
//! returned [`Command`].

use super::event::{AppEvent, Command};
use super::state::{Mode, Status, StatusKind, ViewState};
use super::wrap::{sanitize, truncate, wrap};
use crate::actor::{KeyCode, KeyInput, MouseInput, MouseKind};
use crate::layout;
use crate::mail::Message;
use std::time::Duration;

/// How long a "New: ..." notice stays in the status bar.
pub const TEMP_STATUS_DURATION: Duration = Duration::from_secs(4);
/// Body lines moved per wheel notch.
const WHEEL_LINES: usize = 3;
/// Longest subject shown in a new-message notice.
const NOTICE_SUBJECT_WIDTH: usize = 30;

const WAITING_STATUS: &str = "Waiting for initial emails...";
const STOPPED_STATUS: &str = "Email monitoring stopped. No new emails will be fetched.";

/// Apply one event to the view state.
pub fn update(state: &mut ViewState, event: AppEvent) -> Command {
    match event {
        AppEvent::Resize { width, height } => {
            on_resize(state, width, height);
            Command::None
        }
        AppEvent::Key(key) => on_key(state, key),
        AppEvent::Mouse(mouse) => {
            if state.last_error.is_none() {
                on_mouse(state, mouse);
            }
            Command::None
        }
        AppEvent::NewMessage(message) => on_new_message(state, message),
        AppEvent::MonitorStopped => {
            on_monitor_stopped(state);
            Command::None
        }
        AppEvent::Error(message) => {
            tracing::error!(error = %message, "ui error");
            state.status = Status {
                text: format!("Error: {message}"),
                kind: StatusKind::Error,
                generation: state.status.generation,
            };
            state.last_error = Some(message);
            Command::None
        }
        AppEvent::Tick(now) => {
            state.now = now;
            if state.mode != Mode::Loading {
                refresh_normal(state);
            }
            Command::None
        }
        AppEvent::TempStatusExpired { generation } => {
            if state.status.kind == StatusKind::Temporary && state.status.generation == generation {
                state.status.kind = StatusKind::Normal;
                refresh_normal(state);
            }
            Command::None
        }
    }
}

fn on_resize(state: &mut ViewState, width: u16, height: u16) {
    state.width = width;
    state.height = height;
    ensure_visible(state);
    if state.mode != Mode::Loading {
        return;
    }
    if leave_loading(state) {
        refresh_normal(state);
    } else if state.has_size() {
        set_plain_status(state, WAITING_STATUS);
    }
}

fn on_key(state: &mut ViewState, key: KeyInput) -> Command {
    if key.code == KeyCode::Char('q') || key.is_ctrl('c') {
        tracing::info!("quit requested");
        return Command::Quit;
    }
    if state.last_error.is_some() {
        return Command::None;
    }
    match state.mode {
        Mode::Loading => {}
        Mode::Dashboard => match key.code {
            KeyCode::Up | KeyCode::Char('k') => select_previous(state),
            KeyCode::Down | KeyCode::Char('j') => select_next(state),
            KeyCode::Enter => {
                if state.selected_message().is_some() {
                    state.mode = Mode::Focused;
                    state.focused_scroll = 0;
                    refresh_normal(state);
                }
            }
            KeyCode::Char('K') => scroll_preview_up(state, 1),
            KeyCode::Char('J') => scroll_preview_down(state, 1),
            _ => {}
        },
        Mode::Focused => match key.code {
            KeyCode::Esc => {
                state.mode = Mode::Dashboard;
                state.focused_scroll = 0;
                state.preview_scroll = 0;
                refresh_normal(state);
            }
            KeyCode::Up | KeyCode::Char('k') => scroll_focused_up(state, 1),
            KeyCode::Down | KeyCode::Char('j') => scroll_focused_down(state, 1),
            KeyCode::PageUp => {
                let page = focused_page(state).1.max(1);
                scroll_focused_up(state, page);
            }
            KeyCode::PageDown => {
                let page = focused_page(state).1.max(1);
                scroll_focused_down(state, page);
            }
            _ => {}
        },
    }
    Command::None
}

fn on_mouse(state: &mut ViewState, mouse: MouseInput) {
    match state.mode {
        Mode::Loading => {}
        Mode::Dashboard => {
            let layout = layout::dashboard(state.width, state.height);
            if layout.list.pane.contains(mouse.x, mouse.y) {
                match mouse.kind {
                    MouseKind::ScrollUp => select_previous(state),
                    MouseKind::ScrollDown => select_next(state),
                    MouseKind::LeftClick => {
                        let index = layout
                            .list
                            .slot_at(mouse.x, mouse.y)
                            .map(|slot| slot + state.viewport_top);
                        if let Some(index) = index.filter(|&i| i < state.messages.len()) {
                            select(state, index);
                        }
                    }
                }
            } else if layout.preview.outer.contains(mouse.x, mouse.y) {
                match mouse.kind {
                    MouseKind::ScrollUp => scroll_preview_up(state, WHEEL_LINES),
                    MouseKind::ScrollDown => scroll_preview_down(state, WHEEL_LINES),
                    MouseKind::LeftClick => {}
                }
            }
        }
        Mode::Focused => match mouse.kind {
            MouseKind::ScrollUp => scroll_focused_up(state, WHEEL_LINES),
            MouseKind::ScrollDown => scroll_focused_down(state, WHEEL_LINES),
            MouseKind::LeftClick => {}
        },
    }
}

fn on_new_message(state: &mut ViewState, message: Message) -> Command {
    let previous = state.selected_message().map(|m| m.id.clone());
    let subject = message.subject.clone();
    let id = message.id.clone();
    let Some(at) = state.messages.insert(message) else {
        tracing::debug!(id = %id, "duplicate message ignored");
        return Command::None;
    };
    tracing::debug!(id = %id, index = at, "message inserted");

    state.selected = previous
        .and_then(|id| state.messages.position(&id))
        .or(Some(at));
    ensure_visible(state);

    if state.mode == Mode::Loading {
        if leave_loading(state) {
            refresh_normal(state);
        }
        return Command::None;
    }
    if state.status.kind == StatusKind::Error {
        return Command::None;
    }
    let generation = state.status.generation + 1;
    state.status = Status {
        text: format!("New: {}", truncate(&sanitize(&subject), NOTICE_SUBJECT_WIDTH)),
        kind: StatusKind::Temporary,
        generation,
    };
    Command::ExpireStatusAfter {
        after: TEMP_STATUS_DURATION,
        generation,
    }
}

fn on_monitor_stopped(state: &mut ViewState) {
    tracing::info!("mail monitor stopped");
    state.monitor_stopped = true;
    if state.mode == Mode::Loading {
        if leave_loading(state) {
            set_plain_status(state, STOPPED_STATUS);
        }
    } else {
        refresh_normal(state);
    }
}

/// Switch Loading to Dashboard once there is a size and something to show.
fn leave_loading(state: &mut ViewState) -> bool {
    let ready = state.has_size() && (!state.messages.is_empty() || state.monitor_stopped);
    if ready {
        state.mode = Mode::Dashboard;
    }
    ready
}

fn set_plain_status(state: &mut ViewState, text: &str) {
    if state.status.kind != StatusKind::Normal {
        return;
    }
    state.status.text = text.to_string();
}

/// Recompute the Normal status text. Temporary and Error statuses stay.
fn refresh_normal(state: &mut ViewState) {
    if state.status.kind != StatusKind::Normal {
        return;
    }
    let monitor = if state.monitor_stopped {
        "Monitor Off: no new emails will be fetched".to_string()
    } else {
        format!("Watching (API Poll: {})", format_interval(state.poll_interval))
    };
    let hints = match state.mode {
        Mode::Loading => "[Q/Ctrl+C]:Quit",
        Mode::Dashboard => "[Q/Ctrl+C]:Quit | [↑↓/jk]:Nav | [Enter]:Full | [KJ]:Scroll Preview",
        Mode::Focused => "[Q/Ctrl+C]:Quit | [Esc]:Back | [↑↓/jk PgUp/PgDn]:Scroll",
    };
    state.status.text = format!(
        " {monitor} | {} | {} emails | {hints}",
        state.now.format("%H:%M:%S"),
        state.messages.len(),
    );
}

/// Render a poll interval the way people write it: `30s`, `1m30s`, `500ms`.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs == 0 {
        return format!("{}ms", interval.subsec_millis());
    }
    if secs < 60 {
        return format!("{secs}s");
    }
    format!("{}m{}s", secs / 60, secs % 60)
}

fn select(state: &mut ViewState, index: usize) {
    if state.selected != Some(index) {
        state.preview_scroll = 0;
    }
    state.selected = Some(index);
    ensure_visible(state);
}

fn select_previous(state: &mut ViewState) {
    if let Some(current) = state.selected.filter(|&i| i > 0) {
        select(state, current - 1);
    }
}

fn select_next(state: &mut ViewState) {
    if let Some(current) = state.selected.filter(|&i| i + 1 < state.messages.len()) {
        select(state, current + 1);
    }
}

/// Move the list viewport so the selection is on screen.
fn ensure_visible(state: &mut ViewState) {
    let total = state.messages.len();
    let Some(selected) = state.selected.filter(|&i| i < total) else {
        state.selected = None;
        state.viewport_top = 0;
        return;
    };
    let per_page = layout::dashboard(state.width, state.height)
        .list
        .items_per_page();
    if per_page == 0 {
        state.viewport_top = selected;
        return;
    }
    let mut top = state.viewport_top;
    if selected < top {
        top = selected;
    } else if selected >= top + per_page {
        top = selected + 1 - per_page;
    }
    state.viewport_top = top.min(total.saturating_sub(per_page));
}

/// The offset actually used for a body of `total` lines in a `page`-line
/// window.
pub const fn effective_scroll(offset: usize, total: usize, page: usize) -> usize {
    if total > page {
        let max = total - page;
        if offset < max {
            offset
        } else {
            max
        }
    } else {
        0
    }
}

const fn scrolled_down(offset: usize, lines: usize, total: usize, page: usize) -> usize {
    effective_scroll(offset.saturating_add(lines), total, page)
}

const fn scrolled_up(offset: usize, lines: usize, total: usize, page: usize) -> usize {
    effective_scroll(offset, total, page).saturating_sub(lines)
}

/// Wrapped line count of the selected body and the window height, for a
/// body area of the given size.
fn body_extent(state: &ViewState, width: u16, height: u16) -> (usize, usize) {
    let total = state
        .selected_message()
        .map_or(0, |m| wrap(&m.body, usize::from(width)).len());
    (total, usize::from(height))
}

fn preview_page(state: &ViewState) -> (usize, usize) {
    let body = layout::dashboard(state.width, state.height).preview_body();
    body_extent(state, body.width, body.height)
}

fn focused_page(state: &ViewState) -> (usize, usize) {
    let has_cc = state.selected_message().is_some_and(|m| !m.cc.is_empty());
    let body = layout::focused(state.width, state.height).body(has_cc);
    body_extent(state, body.width, body.height)
}

fn scroll_preview_up(state: &mut ViewState, lines: usize) {
    let (total, page) = preview_page(state);
    state.preview_scroll = scrolled_up(state.preview_scroll, lines, total, page);
}

fn scroll_preview_down(state: &mut ViewState, lines: usize) {
    let (total, page) = preview_page(state);
    state.preview_scroll = scrolled_down(state.preview_scroll, lines, total, page);
}

fn scroll_focused_up(state: &mut ViewState, lines: usize) {
    let (total, page) = focused_page(state);
    state.focused_scroll = scrolled_up(state.focused_scroll, lines, total, page);
}

fn scroll_focused_down(state: &mut ViewState, lines: usize) {
    let (total, page) = focused_page(state);
    state.focused_scroll = scrolled_down(state.focused_scroll, lines, total, page);
}

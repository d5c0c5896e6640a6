//! Projection of a [`ViewState`] onto a [`Buffer`].
//!
//! Rendering is pure: the same state and theme always produce the same
//! frame. Geometry comes from [`crate::layout`], the same functions the
//! update step uses for scrolling and hit-testing.

use super::state::{Mode, StatusKind, ViewState, INITIAL_STATUS};
use super::theme::Theme;
use super::update::effective_scroll;
use super::wrap::{sanitize, truncate, wrap};
use crate::buffer::{Buffer, Cell, Style};
use crate::layout::{self, panes::ListLayout, Rect};
use crate::mail::Message;
use chrono::{DateTime, FixedOffset, Local};
use unicode_width::UnicodeWidthStr;

const LOADING_TEXT: &str = "Loading emails...";
const HEADER_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

const WELCOME: &[(&str, WelcomeStyle)] = &[
    ("tmail", WelcomeStyle::Title),
    ("", WelcomeStyle::Text),
    ("No email selected or list is empty.", WelcomeStyle::Text),
    ("", WelcomeStyle::Text),
    ("Navigate emails with ↑ ↓ keys.", WelcomeStyle::Hint),
    ("Press Enter to open in full view.", WelcomeStyle::Hint),
    ("Press Q or Ctrl+C to quit.", WelcomeStyle::Hint),
];

#[derive(Clone, Copy)]
enum WelcomeStyle {
    Title,
    Text,
    Hint,
}

/// Draw the whole screen. `None` while the terminal size is unknown.
pub fn render(state: &ViewState, theme: &Theme) -> Option<Buffer> {
    if !state.has_size() {
        return None;
    }
    let mut buf = Buffer::new(state.width, state.height);
    if let Some(error) = &state.last_error {
        draw_error(&mut buf, error);
        return Some(buf);
    }
    match state.mode {
        Mode::Loading => draw_loading(&mut buf, state),
        Mode::Dashboard => draw_dashboard(&mut buf, state, theme),
        Mode::Focused => draw_focused(&mut buf, state, theme),
    }
    draw_status(&mut buf, state, theme);
    Some(buf)
}

/// List date: time of day for today's messages, month and day otherwise.
pub fn format_list_date(date: Option<DateTime<FixedOffset>>, now: DateTime<Local>) -> String {
    let Some(date) = date else {
        return "???".to_string();
    };
    let local = date.with_timezone(&Local);
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %-d").to_string()
    }
}

/// Header date in local time, `N/A` when unknown.
pub fn format_header_date(date: Option<DateTime<FixedOffset>>) -> String {
    date.map_or_else(
        || "N/A".to_string(),
        |d| d.with_timezone(&Local).format(HEADER_DATE_FORMAT).to_string(),
    )
}

/// Display name of a `From` header.
fn short_sender(from: &str) -> String {
    let clean = sanitize(from);
    let name = match clean.find('<') {
        Some(idx) if idx > 0 => clean[..idx].trim().trim_matches('"').to_string(),
        _ => clean,
    };
    if name.is_empty() {
        "(Unknown Sender)".to_string()
    } else {
        name
    }
}

fn display_subject(subject: &str) -> String {
    let clean = sanitize(subject);
    if clean.is_empty() {
        "(No Subject)".to_string()
    } else {
        clean
    }
}

fn put_line(buf: &mut Buffer, row: Rect, text: &str, style: Style) -> u16 {
    if row.is_empty() {
        return 0;
    }
    buf.put_str(row.x, row.y, text, row.right(), style)
}

fn put_centered(buf: &mut Buffer, area: Rect, text: &str) {
    if area.is_empty() {
        return;
    }
    let shown = truncate(text, usize::from(area.width));
    #[allow(clippy::cast_possible_truncation)]
    let width = shown.width() as u16;
    let x = area.x + (area.width - width.min(area.width)) / 2;
    let y = area.y + area.height / 2;
    buf.put_str(x, y, &shown, area.right(), Style::PLAIN);
}

fn draw_box(buf: &mut Buffer, rect: Rect, style: Style) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let (left, right) = (rect.x, rect.right() - 1);
    let (top, bottom) = (rect.y, rect.bottom() - 1);
    let cell = |c| Cell::from_char(c).with_style(style);
    buf.fill(Rect::new(left + 1, top, rect.width - 2, 1), cell('─'));
    buf.fill(Rect::new(left + 1, bottom, rect.width - 2, 1), cell('─'));
    buf.fill(Rect::new(left, top + 1, 1, rect.height - 2), cell('│'));
    buf.fill(Rect::new(right, top + 1, 1, rect.height - 2), cell('│'));
    buf.set(left, top, cell('┌'));
    buf.set(right, top, cell('┐'));
    buf.set(left, bottom, cell('└'));
    buf.set(right, bottom, cell('┘'));
}

fn draw_error(buf: &mut Buffer, error: &str) {
    let area = buf.area();
    put_line(buf, area.row(1), &format!("   Application Error: {error}"), Style::PLAIN);
    put_line(buf, area.row(3), "   Press Ctrl+C to quit.", Style::PLAIN);
}

fn draw_loading(buf: &mut Buffer, state: &ViewState) {
    let content = layout::panes::screen(state.width, state.height).content;
    let text = if state.status.text.is_empty() || state.status.text == INITIAL_STATUS {
        LOADING_TEXT
    } else {
        state.status.text.as_str()
    };
    put_centered(buf, content, text);
}

fn draw_status(buf: &mut Buffer, state: &ViewState, theme: &Theme) {
    let area = layout::panes::screen(state.width, state.height).status;
    let style = match state.status.kind {
        StatusKind::Normal => theme.status_normal,
        StatusKind::Temporary => theme.status_temporary,
        StatusKind::Error => theme.status_error,
    };
    buf.fill(area, Cell::EMPTY.with_style(style));
    put_line(buf, area, &sanitize_status(&state.status.text), style);
}

/// Status text keeps its leading space but nothing that breaks the row.
fn sanitize_status(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn draw_dashboard(buf: &mut Buffer, state: &ViewState, theme: &Theme) {
    let layout = layout::dashboard(state.width, state.height);
    draw_list(buf, state, &layout.list, theme);

    let preview = layout.preview;
    if preview.outer.is_empty() {
        return;
    }
    draw_box(buf, preview.outer, theme.pane_border);

    let Some(message) = state.selected_message() else {
        put_line(buf, preview.title, " Home ", theme.pane_title);
        draw_welcome(buf, preview.content, theme);
        return;
    };

    let title_room = usize::from(preview.title.width).saturating_sub(12);
    let title = format!(" Preview: {} ", truncate(&display_subject(&message.subject), title_room));
    put_line(buf, preview.title, &title, theme.pane_title);

    let content = preview.content;
    draw_header(buf, content.row(0), "From:", &message.from, theme);
    draw_header(buf, content.row(1), "Date:", &format_header_date(message.date), theme);
    draw_header(buf, content.row(2), "Subject:", &message.subject, theme);
    draw_separator(buf, content.row(4), preview.outer.width, theme);

    draw_body(buf, layout.preview_body(), &message.body, state.preview_scroll, theme);
}

fn draw_list(buf: &mut Buffer, state: &ViewState, list: &ListLayout, theme: &Theme) {
    put_line(buf, list.title, "Emails", theme.list_title);

    let pane = list.pane;
    if pane.width >= 2 {
        let separator = Cell::from_char('│').with_style(theme.list_separator);
        buf.fill(Rect::new(pane.right() - 1, pane.y, 1, pane.height), separator);
    }

    let visible = state
        .messages
        .iter()
        .enumerate()
        .skip(state.viewport_top)
        .take(list.items_per_page());
    for (slot, (index, message)) in visible.enumerate() {
        let selected = state.selected == Some(index);
        draw_list_item(buf, list.item_box(slot), message, selected, state.now, theme);
    }
}

fn draw_list_item(
    buf: &mut Buffer,
    rect: Rect,
    message: &Message,
    selected: bool,
    now: DateTime<Local>,
    theme: &Theme,
) {
    let (border, subject_style, secondary) = if selected {
        (theme.selected_border, theme.selected_subject, theme.selected_secondary)
    } else {
        (theme.item_border, theme.item_subject, theme.item_secondary)
    };
    draw_box(buf, rect, border);

    // One column of padding inside each side of the box.
    let text = rect.inset(2, 1);
    if text.is_empty() {
        return;
    }
    let room = usize::from(text.width);
    put_line(buf, text.row(0), &truncate(&display_subject(&message.subject), room), subject_style);

    let date = format_list_date(message.date, now);
    let from_room = room.saturating_sub(date.width() + 1);
    let line = if from_room == 0 {
        truncate(&date, room)
    } else {
        format!("{} {date}", truncate(&short_sender(&message.from), from_room))
    };
    put_line(buf, text.row(1), &line, secondary);
}

fn draw_header(buf: &mut Buffer, row: Rect, key: &str, value: &str, theme: &Theme) {
    let used = put_line(buf, row, key, theme.header_key) + 1;
    if used >= row.width {
        return;
    }
    let room = usize::from(row.width - used);
    let value_row = Rect::new(row.x + used, row.y, row.width - used, row.height);
    put_line(buf, value_row, &truncate(&sanitize(value), room), theme.header_value);
}

fn draw_separator(buf: &mut Buffer, row: Rect, pane_width: u16, theme: &Theme) {
    if row.is_empty() {
        return;
    }
    let width = (pane_width / 2).min(row.width);
    buf.fill(
        Rect::new(row.x, row.y, width, 1),
        Cell::from_char('─').with_style(theme.pane_border),
    );
}

fn draw_body(buf: &mut Buffer, area: Rect, body: &str, scroll: usize, theme: &Theme) {
    if area.is_empty() {
        return;
    }
    let lines = wrap(body, usize::from(area.width));
    let page = usize::from(area.height);
    let top = effective_scroll(scroll, lines.len(), page);
    for (dy, line) in (0..area.height).zip(lines.iter().skip(top)) {
        put_line(buf, area.row(dy), line, theme.body);
    }
}

fn draw_welcome(buf: &mut Buffer, area: Rect, theme: &Theme) {
    // A blank row above the title.
    for (dy, (text, kind)) in (1..area.height).zip(WELCOME) {
        let style = match kind {
            WelcomeStyle::Title => theme.welcome_title,
            WelcomeStyle::Text => Style::PLAIN,
            WelcomeStyle::Hint => theme.hint,
        };
        put_line(buf, area.row(dy), text, style);
    }
}

fn draw_focused(buf: &mut Buffer, state: &ViewState, theme: &Theme) {
    let layout = layout::focused(state.width, state.height);
    let pane = layout.pane;
    draw_box(buf, pane.outer, theme.pane_border);

    let Some(message) = state.selected_message() else {
        put_line(buf, pane.title, " Error ", theme.pane_title);
        put_line(buf, pane.content.row(1), "No email selected.", Style::PLAIN);
        return;
    };

    let title_room = usize::from(pane.title.width).saturating_sub(15);
    let title = format!(" Full View: {} ", truncate(&display_subject(&message.subject), title_room));
    put_line(buf, pane.title, &title, theme.pane_title);

    let content = pane.content;
    let has_cc = !message.cc.is_empty();
    let date = format_header_date(message.date);
    let mut headers = vec![("From:", message.from.as_str()), ("To:", message.to.as_str())];
    if has_cc {
        headers.push(("Cc:", message.cc.as_str()));
    }
    headers.push(("Date:", date.as_str()));
    headers.push(("Subject:", message.subject.as_str()));

    let mut dy = 0;
    for (key, value) in headers {
        draw_header(buf, content.row(dy), key, value, theme);
        dy += 1;
    }
    draw_separator(buf, content.row(dy + 1), pane.outer.width, theme);

    draw_body(buf, layout.body(has_cc), &message.body, state.focused_scroll, theme);
}

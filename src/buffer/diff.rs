//! Diffing Engine: Generate minimal ANSI sequences from buffer changes.
//!
//! 1. Compare the displayed and the next buffer cell by cell
//! 2. Emit a cursor move only when the next changed cell is not adjacent
//! 3. Track the last emitted style to avoid redundant SGR sequences
//!
//! All output is accumulated in a single `Vec<u8>` and flushed with one write.

use super::{Buffer, Cell, Color, Modifiers, Style};
use std::io::Write;

/// Terminal state as last emitted.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    /// Last emitted style, `None` when unknown.
    style: Option<Style>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            style: None,
        }
    }

    /// Forget everything (after a full redraw or a raw write).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Statistics about a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Cells that differed.
    pub cells_changed: usize,
    /// Cursor move sequences emitted.
    pub cursor_moves: usize,
    /// SGR style sequences emitted.
    pub style_changes: usize,
}

/// Append the ANSI needed to turn `current` into `next` to `output`.
///
/// Both buffers must have the same dimensions.
pub fn render_diff(current: &Buffer, next: &Buffer, output: &mut Vec<u8>, state: &mut DiffState) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = usize::from(next.width());

    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new || new.is_wide_continuation() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((idx % width) as u16, (idx / width) as u16);

        result.cells_changed += 1;
        if state.cursor_x != x || state.cursor_y != y {
            emit_cursor_move(output, x, y);
            state.cursor_x = x;
            state.cursor_y = y;
            result.cursor_moves += 1;
        }
        if state.style != Some(new.style()) {
            emit_style(output, new.style());
            state.style = Some(new.style());
            result.style_changes += 1;
        }
        emit_grapheme(output, new);
        state.cursor_x = state.cursor_x.saturating_add(u16::from(new.display_width().max(1)));
    }

    result
}

/// Redraw every cell, ignoring what is on screen.
pub fn render_full(buffer: &Buffer, output: &mut Vec<u8>) {
    output.extend_from_slice(b"\x1b[0m\x1b[2J");
    let mut last: Option<Style> = None;
    for y in 0..buffer.height() {
        emit_cursor_move(output, 0, y);
        for x in 0..buffer.width() {
            let Some(cell) = buffer.get(x, y) else {
                continue;
            };
            if cell.is_wide_continuation() {
                continue;
            }
            if last != Some(cell.style()) {
                emit_style(output, cell.style());
                last = Some(cell.style());
            }
            emit_grapheme(output, cell);
        }
    }
    output.extend_from_slice(b"\x1b[0m");
}

/// Emit a cursor move sequence (ANSI is 1-indexed).
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;
    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

/// Emit a full SGR for `style`: reset, colors, then modifiers.
fn emit_style(output: &mut Vec<u8>, style: Style) {
    output.extend_from_slice(b"\x1b[0");
    match style.fg {
        Color::Default => {}
        Color::Rgb(c) => {
            let _ = write!(output, ";38;2;{};{};{}", c.r, c.g, c.b);
        }
    }
    match style.bg {
        Color::Default => {}
        Color::Rgb(c) => {
            let _ = write!(output, ";48;2;{};{};{}", c.r, c.g, c.b);
        }
    }
    for (flag, code) in [
        (Modifiers::BOLD, ";1"),
        (Modifiers::DIM, ";2"),
        (Modifiers::ITALIC, ";3"),
        (Modifiers::UNDERLINE, ";4"),
        (Modifiers::REVERSED, ";7"),
    ] {
        if style.modifiers.contains(flag) {
            output.extend_from_slice(code.as_bytes());
        }
    }
    output.push(b'm');
}

#[inline]
fn emit_grapheme(output: &mut Vec<u8>, cell: &Cell) {
    output.extend_from_slice(cell.grapheme().as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_diff_identical_buffers() {
        let a = Buffer::new(10, 5);
        let b = Buffer::new(10, 5);
        let mut output = Vec::new();
        let result = render_diff(&a, &b, &mut output, &mut DiffState::new());
        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(5, 2, Cell::from_char('X'));

        let mut output = Vec::new();
        let result = render_diff(&a, &b, &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 1);
        let text = String::from_utf8_lossy(&output);
        assert!(text.starts_with("\x1b[3;6H"));
        assert!(text.ends_with('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_single_move() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.put_str(2, 1, "ABC", 10, Style::PLAIN);

        let mut output = Vec::new();
        let result = render_diff(&a, &b, &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(result.style_changes, 1);
    }

    #[test]
    fn test_diff_style_change_emits_sgr() {
        let a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        let red = Style::PLAIN.fg(Rgb::new(255, 0, 0)).bold();
        b.put_str(0, 0, "a", 4, red);
        b.put_str(1, 0, "b", 4, Style::PLAIN);

        let mut output = Vec::new();
        let result = render_diff(&a, &b, &mut output, &mut DiffState::new());

        assert_eq!(result.style_changes, 2);
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("\x1b[0;38;2;255;0;0;1ma"));
        assert!(text.contains("\x1b[0mb"));
    }

    #[test]
    fn test_diff_wide_char_advances_two() {
        let a = Buffer::new(6, 1);
        let mut b = Buffer::new(6, 1);
        b.put_str(0, 0, "日x", 6, Style::PLAIN);

        let mut output = Vec::new();
        let result = render_diff(&a, &b, &mut output, &mut DiffState::new());

        assert_eq!(result.cells_changed, 2);
        assert_eq!(result.cursor_moves, 1);
    }

    #[test]
    fn test_cursor_move_forms() {
        let mut output = Vec::new();
        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_render_full() {
        let mut buffer = Buffer::new(3, 2);
        buffer.put_str(0, 0, "ABC", 3, Style::PLAIN);

        let mut output = Vec::new();
        render_full(&buffer, &mut output);

        let text = String::from_utf8_lossy(&output);
        assert!(text.starts_with("\x1b[0m\x1b[2J\x1b[H"));
        assert!(text.contains("ABC"));
        assert!(text.contains("\x1b[2H"));
        assert!(text.ends_with("\x1b[0m"));
    }
}

//! Buffer: A grid of cells representing the terminal screen.
//!
//! Cells are stored contiguously in row-major order. Drawing helpers clip
//! to the buffer (and to an explicit column limit), so callers can draw
//! with unchecked coordinates on tiny terminals.

use super::cell::{Cell, Style};
use crate::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;

/// A grid of cells representing the terminal screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Buffer {
    /// Create a blank buffer. Zero dimensions yield an empty buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Buffer width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area.
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// The underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set the cell at (x, y). Returns `false` when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        self.index_of(x, y).is_some_and(|idx| {
            self.cells[idx] = cell;
            true
        })
    }

    /// Draw `text` on row `y` starting at column `x`, never writing at or
    /// beyond column `limit`.
    ///
    /// Wide graphemes that would straddle the limit are not drawn.
    /// Returns the number of columns written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, limit: u16, style: Style) -> u16 {
        let limit = limit.min(self.width);
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let Some(cell) = Cell::from_grapheme(grapheme) else {
                continue;
            };
            let width = u16::from(cell.display_width());
            if width == 0 {
                continue;
            }
            if col.saturating_add(width) > limit {
                break;
            }
            self.set(col, y, cell.with_style(style));
            if width == 2 {
                self.set(col + 1, y, Cell::wide_continuation(style));
            }
            col += width;
        }
        col.saturating_sub(x)
    }

    /// Fill a rectangular region (clipped to the buffer) with a cell.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let right = rect.right().min(self.width);
        let bottom = rect.bottom().min(self.height);
        for y in rect.y..bottom {
            for x in rect.x..right {
                self.set(x, y, cell);
            }
        }
    }

    /// The text of row `y`, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .filter(|cell| !cell.is_wide_continuation())
            .map(Cell::grapheme)
            .collect()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.cells().len(), 80 * 24);
    }

    #[test]
    fn test_buffer_zero_size() {
        let mut buffer = Buffer::new(0, 0);
        assert!(buffer.cells().is_empty());
        assert_eq!(buffer.put_str(0, 0, "x", 10, Style::PLAIN), 0);
        assert!(!buffer.set(0, 0, Cell::EMPTY));
    }

    #[test]
    fn test_buffer_bounds() {
        let buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(buffer.get(79, 24).is_none());
    }

    #[test]
    fn test_put_str_clips_at_limit() {
        let mut buffer = Buffer::new(10, 1);
        let written = buffer.put_str(2, 0, "hello world", 6, Style::PLAIN);
        assert_eq!(written, 4);
        assert_eq!(buffer.row_text(0), "  hell    ");
    }

    #[test]
    fn test_put_str_wide_chars() {
        let mut buffer = Buffer::new(5, 1);
        let written = buffer.put_str(0, 0, "日本語", 5, Style::PLAIN);
        // The third character would straddle column 5.
        assert_eq!(written, 4);
        assert!(buffer.get(1, 0).unwrap().is_wide_continuation());
        assert_eq!(buffer.row_text(0), "日本 ");
    }

    #[test]
    fn test_put_str_applies_style() {
        let mut buffer = Buffer::new(4, 1);
        let style = Style::PLAIN.fg(Rgb::new(1, 2, 3)).bold();
        buffer.put_str(0, 0, "ab", 4, style);
        assert_eq!(buffer.get(1, 0).unwrap().style(), style);
        assert_eq!(buffer.get(2, 0).unwrap().style(), Style::PLAIN);
    }

    #[test]
    fn test_fill_clips() {
        let mut buffer = Buffer::new(4, 2);
        buffer.fill(Rect::new(2, 1, 10, 10), Cell::from_char('#'));
        assert_eq!(buffer.row_text(0), "    ");
        assert_eq!(buffer.row_text(1), "  ##");
    }

}

//! Rect: A rectangle primitive for layout calculations.
//!
//! All operations saturate, so a layout computed for a terminal smaller
//! than its chrome collapses to empty rectangles instead of underflowing.

/// A rectangle defined by position and size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate (column) of the top-left corner.
    pub x: u16,
    /// Y coordinate (row) of the top-left corner.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Zero-sized rectangle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from a terminal size (full screen).
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check if the rectangle is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by `horizontal` columns on the left and right and `vertical`
    /// rows on the top and bottom.
    #[must_use]
    pub const fn inset(&self, horizontal: u16, vertical: u16) -> Self {
        let (h2, v2) = (horizontal.saturating_mul(2), vertical.saturating_mul(2));
        if self.width <= h2 || self.height <= v2 {
            return Self::new(self.x, self.y, 0, 0);
        }
        Self::new(
            self.x + horizontal,
            self.y + vertical,
            self.width - h2,
            self.height - v2,
        )
    }

    /// Split into left and right at a column offset.
    pub fn split_horizontal(&self, at: u16) -> (Self, Self) {
        let at = at.min(self.width);
        (
            Self::new(self.x, self.y, at, self.height),
            Self::new(self.x + at, self.y, self.width - at, self.height),
        )
    }

    /// Split into top and bottom at a row offset.
    pub fn split_vertical(&self, at: u16) -> (Self, Self) {
        let at = at.min(self.height);
        (
            Self::new(self.x, self.y, self.width, at),
            Self::new(self.x, self.y + at, self.width, self.height - at),
        )
    }

    /// The row at offset `dy`, or an empty rect past the bottom.
    pub fn row(&self, dy: u16) -> Self {
        if dy >= self.height {
            return Self::new(self.x, self.bottom(), self.width, 0);
        }
        Self::new(self.x, self.y + dy, self.width, 1)
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.width, self.height)
    }
}

//! Cell: The atomic unit of terminal display.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Cell                                                    │
//! ├─────────────┬──────────────┬─────────────────────────────┤
//! │  grapheme   │  len + width │  style (fg, bg, modifiers)  │
//! │  [u8; 4]    │  u8 + u8     │                             │
//! └─────────────┴──────────────┴─────────────────────────────┘
//! ```
//!
//! Graphemes longer than four UTF-8 bytes (ZWJ emoji sequences, stacked
//! combining marks) keep only their first scalar value. A width of zero
//! marks the right half of a wide character.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A foreground or background color.
///
/// `Default` leaves the terminal's own color in place, so the dashboard
/// sits on whatever background the user has configured.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub enum Color {
    /// The terminal's configured color.
    #[default]
    Default,
    /// A 24-bit color.
    Rgb(Rgb),
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// ```
    /// use tmail::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::DIM;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0001_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Colors and modifiers applied to a run of cells.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Terminal defaults, no modifiers.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        modifiers: Modifiers::empty(),
    };

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, rgb: Rgb) -> Self {
        self.fg = Color::Rgb(rgb);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, rgb: Rgb) -> Self {
        self.bg = Color::Rgb(rgb);
        self
    }

    /// Add bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::BOLD);
        self
    }

    /// Add dim.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.modifiers = self.modifiers.union(Modifiers::DIM);
        self
    }
}

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Inline grapheme storage (UTF-8 bytes).
    grapheme: [u8; 4],
    /// Byte length of the grapheme.
    grapheme_len: u8,
    /// Display width (0 = continuation, 1 = normal, 2 = wide).
    display_width: u8,
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A blank cell with the terminal's default colors.
    pub const EMPTY: Self = Self {
        grapheme: [b' ', 0, 0, 0],
        grapheme_len: 1,
        display_width: 1,
        style: Style::PLAIN,
    };

    /// Create a cell from a single character.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_char(c: char) -> Self {
        let mut grapheme = [0u8; 4];
        let len = c.encode_utf8(&mut grapheme).len();
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0).min(2);
        Self {
            grapheme,
            grapheme_len: len as u8,
            display_width: width as u8,
            style: Style::PLAIN,
        }
    }

    /// Create a cell from a grapheme cluster.
    ///
    /// Returns `None` for an empty string or a control character, which
    /// must never reach the terminal.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_grapheme(s: &str) -> Option<Self> {
        let first = s.chars().next()?;
        if first.is_control() {
            return None;
        }
        if s.len() > 4 {
            let mut cell = Self::from_char(first);
            cell.display_width = (unicode_width::UnicodeWidthStr::width(s).clamp(1, 2)) as u8;
            return Some(cell);
        }
        let mut grapheme = [0u8; 4];
        grapheme[..s.len()].copy_from_slice(s.as_bytes());
        let width = unicode_width::UnicodeWidthStr::width(s).min(2);
        Some(Self {
            grapheme,
            grapheme_len: s.len() as u8,
            display_width: width as u8,
            style: Style::PLAIN,
        })
    }

    /// The right half of a wide character.
    pub const fn wide_continuation(style: Style) -> Self {
        Self {
            grapheme: [0; 4],
            grapheme_len: 0,
            display_width: 0,
            style,
        }
    }

    /// The grapheme as a string slice.
    pub fn grapheme(&self) -> &str {
        std::str::from_utf8(&self.grapheme[..self.grapheme_len as usize]).unwrap_or(" ")
    }

    /// Whether this is the right half of a wide character.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.display_width == 0 && self.grapheme_len == 0
    }

    /// Display width (0, 1 or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.display_width
    }

    /// The cell's style.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("grapheme", &self.grapheme())
            .field("width", &self.display_width)
            .field("style", &self.style)
            .finish()
    }
}

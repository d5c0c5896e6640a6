//! Colors and text styles for every element the renderer draws.

use crate::buffer::{Rgb, Style};

/// Immutable style table passed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// "Emails" heading above the list.
    pub list_title: Style,
    /// Vertical rule between list and preview.
    pub list_separator: Style,
    /// Box characters of an unselected entry.
    pub item_border: Style,
    /// Subject line of an unselected entry.
    pub item_subject: Style,
    /// Sender/date line of an unselected entry.
    pub item_secondary: Style,
    /// Box characters of the selected entry.
    pub selected_border: Style,
    /// Subject line of the selected entry.
    pub selected_subject: Style,
    /// Sender/date line of the selected entry.
    pub selected_secondary: Style,
    /// Border of the preview and focused panes.
    pub pane_border: Style,
    /// Title bar of the preview and focused panes.
    pub pane_title: Style,
    /// Header names (`From:`, `Date:` ...).
    pub header_key: Style,
    /// Header values.
    pub header_value: Style,
    /// Message body text.
    pub body: Style,
    /// Program name on the welcome text.
    pub welcome_title: Style,
    /// Hints and other secondary text.
    pub hint: Style,
    /// Status bar, normal state.
    pub status_normal: Style,
    /// Status bar, new-message notice.
    pub status_temporary: Style,
    /// Status bar, error.
    pub status_error: Style,
}

const GRAY_238: Rgb = Rgb::from_u32(0x44_44_44);
const GRAY_240: Rgb = Rgb::from_u32(0x58_58_58);
const GRAY_244: Rgb = Rgb::from_u32(0x80_80_80);
const GRAY_250: Rgb = Rgb::from_u32(0xBC_BC_BC);
const GRAY_235: Rgb = Rgb::from_u32(0x26_26_26);
const WHITE: Rgb = Rgb::from_u32(0xFF_FF_FF);
const NEAR_WHITE: Rgb = Rgb::from_u32(0xEE_EE_EE);
const LAVENDER: Rgb = Rgb::from_u32(0x87_5F_FF);
const PALE_LAVENDER: Rgb = Rgb::from_u32(0xD7_D7_FF);
const INDIGO: Rgb = Rgb::from_u32(0x5F_5F_FF);
const AMBER: Rgb = Rgb::from_u32(0xFF_AF_00);
const SKY: Rgb = Rgb::from_u32(0x87_CE_EB);
const GREEN: Rgb = Rgb::from_u32(0x00_87_00);
const RED: Rgb = Rgb::from_u32(0xFF_00_00);

impl Theme {
    /// The stock dark-terminal palette.
    pub const DEFAULT: Self = Self {
        list_title: Style::PLAIN.fg(INDIGO).bold(),
        list_separator: Style::PLAIN.fg(GRAY_240),
        item_border: Style::PLAIN.fg(GRAY_238),
        item_subject: Style::PLAIN.fg(WHITE),
        item_secondary: Style::PLAIN.fg(GRAY_244),
        selected_border: Style::PLAIN.fg(LAVENDER),
        selected_subject: Style::PLAIN.fg(WHITE).bold(),
        selected_secondary: Style::PLAIN.fg(PALE_LAVENDER),
        pane_border: Style::PLAIN.fg(GRAY_240),
        pane_title: Style::PLAIN.fg(NEAR_WHITE).bg(INDIGO).bold(),
        header_key: Style::PLAIN.fg(AMBER).bold(),
        header_value: Style::PLAIN,
        body: Style::PLAIN,
        welcome_title: Style::PLAIN.fg(SKY).bold(),
        hint: Style::PLAIN.dim(),
        status_normal: Style::PLAIN.fg(GRAY_250).bg(GRAY_235),
        status_temporary: Style::PLAIN.fg(NEAR_WHITE).bg(GREEN),
        status_error: Style::PLAIN.fg(NEAR_WHITE).bg(RED),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

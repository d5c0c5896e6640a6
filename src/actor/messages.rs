//! Message types for actor communication.
//!
//! These enums define the protocol between the input actor, the UI loop and
//! the render actor.

use crate::buffer::Buffer;

/// Key codes the UI reacts to.
///
/// A subset of crossterm's `KeyCode`; anything else is dropped by the
/// input actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Esc,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// The key.
    pub code: KeyCode,
    /// Modifiers held during the press.
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    /// A key press without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Whether this is `Ctrl+<c>`.
    pub fn is_ctrl(&self, c: char) -> bool {
        self.modifiers.control && self.code == KeyCode::Char(c)
    }
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    /// Wheel scrolled up.
    ScrollUp,
    /// Wheel scrolled down.
    ScrollDown,
    /// Left button pressed.
    LeftClick,
}

/// A mouse event at a cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseInput {
    /// What happened.
    pub kind: MouseKind,
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyInput),
    /// Mouse wheel or click.
    Mouse(MouseInput),
    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// Reading terminal events failed.
    Error(String),
}

/// Commands sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Show this frame. A frame with new dimensions triggers a full redraw.
    Update(Box<Buffer>),
    /// Stop the render thread.
    Shutdown,
}

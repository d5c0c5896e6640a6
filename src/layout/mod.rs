//! Layout module: screen geometry computed from the terminal size.
//!
//! Layouts are recomputed on every frame from `(width, height)`; there is no
//! retained layout tree.

pub mod panes;
mod rect;

pub use panes::{dashboard, focused, DashboardLayout, FocusedLayout};
pub use rect::Rect;

//! Buffer module: the off-screen frame the UI renders into.
//!
//! - [`Cell`]: one grapheme plus its [`Style`]
//! - [`Buffer`]: a grid of cells representing the terminal screen
//! - [`Rgb`] / [`Color`]: true color or the terminal default
//! - [`Modifiers`]: text style bitflags
//! - [`diff`]: minimal ANSI output between two frames

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use buffer::Buffer;
pub use cell::{Cell, Color, Modifiers, Rgb, Style};

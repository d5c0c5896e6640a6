//! Actor Model: Message-passing concurrency for the terminal front end.
//!
//! - **Input Actor**: polls terminal events, forwards them to the UI loop
//! - **Render Actor**: receives finished frames, diffs and flushes them
//! - **UI Loop** ([`crate::app`]): owns the view state, renders frames
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐    Message    ┌──────────────┐
//! │ Input Thread │ ──────────────────▶ │              │ ◀──────────── │ Synchronizer │
//! └──────────────┘                     │   UI Loop    │               └──────────────┘
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀────────────────── │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod input;
mod messages;
mod renderer;
mod terminal;

pub use input::{convert_event, InputActor};
pub use messages::{InputEvent, KeyCode, KeyInput, KeyModifiers, MouseInput, MouseKind, RenderCommand};
pub use renderer::{RenderStats, Renderer, RendererActor};
pub use terminal::{Terminal, TerminalConfig};

//! UI core: a state machine over [`ViewState`] and a pure renderer.
//!
//! ```text
//! AppEvent ──▶ update(&mut ViewState) ──▶ Command (quit, timers)
//!                     │
//!                     ▼
//!              render(&ViewState, &Theme) ──▶ Buffer
//! ```

mod collection;
mod event;
mod render;
mod state;
mod theme;
mod update;
pub mod wrap;

pub use collection::MessageCollection;
pub use event::{AppEvent, Command};
pub use render::{format_header_date, format_list_date, render};
pub use state::{Mode, Status, StatusKind, ViewState, INITIAL_STATUS};
pub use theme::Theme;
pub use update::{effective_scroll, format_interval, update, TEMP_STATUS_DURATION};

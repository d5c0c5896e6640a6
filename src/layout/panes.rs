//! Pane budgeting for the dashboard and the focused view.
//!
//! Layouts are pure functions of the terminal size. Both the update step
//! (viewport and scroll clamping, mouse hit-testing) and the renderer call
//! them, so what is scrolled is exactly what is drawn.
//!
//! ```text
//! ┌─ list pane ──────────┬─ preview pane ─────────────────────────┐
//! │ Emails               │┌──────────────────────────────────────┐│
//! │                      ││ Preview: <subject>          (title)  ││
//! │ ┌──────────────────┐ ││ From: ...                            ││
//! │ │ subject          │ ││ Date: ...                            ││
//! │ │ sender     date  │ ││ Subject: ...                         ││
//! │ └──────────────────┘ ││                                      ││
//! │  ... 4 rows/item     ││ ──────────────                       ││
//! │                      ││                              (margin)││
//! │                      ││ body ...                             ││
//! │                      │└──────────────────────────────────────┘│
//! ├──────────────────────┴────────────────────────────────────────┤
//! │ status bar (1 row)                                            │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use super::Rect;

/// Rows reserved for the status bar.
pub const STATUS_ROWS: u16 = 1;
/// Rows per list entry (a boxed, two-line summary).
pub const LIST_ITEM_ROWS: u16 = 4;
/// The list title plus the gap below it.
pub const LIST_TITLE_ROWS: u16 = 2;
/// Narrowest list pane.
pub const MIN_LIST_WIDTH: u16 = 30;
/// Narrowest preview pane.
pub const MIN_PREVIEW_WIDTH: u16 = 40;
/// Preferred share of the width given to the list.
const LIST_WIDTH_PERCENT: u32 = 35;
/// Separator column plus padding on the right of the list.
const LIST_RIGHT_CHROME: u16 = 2;
/// From, Date, Subject, a blank line, the separator.
pub const PREVIEW_HEADER_ROWS: u16 = 5;
/// Blank row between the preview header block and the body.
pub const BODY_MARGIN_ROWS: u16 = 1;

/// The terminal split into content and status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    /// Everything above the status bar.
    pub content: Rect,
    /// The status bar row (empty when the terminal has no rows).
    pub status: Rect,
}

/// Split the terminal into content area and status bar.
pub fn screen(width: u16, height: u16) -> Screen {
    let content_height = height.saturating_sub(STATUS_ROWS);
    let (content, status) = Rect::from_size(width, height).split_vertical(content_height);
    Screen { content, status }
}

/// Widths of the list and preview panes for a terminal `width` columns wide.
///
/// The preview collapses first: below [`MIN_LIST_WIDTH`] the list takes
/// everything.
pub fn dashboard_widths(width: u16) -> (u16, u16) {
    if width < MIN_LIST_WIDTH + MIN_PREVIEW_WIDTH {
        let list = if width < MIN_LIST_WIDTH { width } else { MIN_LIST_WIDTH };
        return (list, width - list);
    }
    #[allow(clippy::cast_possible_truncation)]
    let target = (u32::from(width) * LIST_WIDTH_PERCENT / 100) as u16;
    let list = target.max(MIN_LIST_WIDTH).min(width - MIN_PREVIEW_WIDTH);
    (list, width - list)
}

/// The list pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    /// Whole pane, separator column included.
    pub pane: Rect,
    /// Title row.
    pub title: Rect,
    /// Area holding the stacked entries.
    pub items: Rect,
}

impl ListLayout {
    fn new(pane: Rect) -> Self {
        let inner = Rect::new(
            pane.x,
            pane.y,
            pane.width.saturating_sub(LIST_RIGHT_CHROME),
            pane.height,
        );
        let (head, items) = inner.split_vertical(LIST_TITLE_ROWS);
        Self {
            pane,
            title: head.row(0),
            items,
        }
    }

    /// How many whole entries fit.
    pub fn items_per_page(&self) -> usize {
        usize::from(self.items.height / LIST_ITEM_ROWS)
    }

    /// The box of the entry shown in `slot` (0 = top of the viewport).
    pub fn item_box(&self, slot: usize) -> Rect {
        let offset = u16::try_from(slot)
            .ok()
            .and_then(|s| s.checked_mul(LIST_ITEM_ROWS))
            .unwrap_or(u16::MAX);
        Rect::new(
            self.items.x.saturating_add(1),
            self.items.y.saturating_add(offset),
            self.items.width.saturating_sub(1),
            LIST_ITEM_ROWS,
        )
    }

    /// The viewport slot under row `y`, if `(x, y)` is on an entry.
    pub fn slot_at(&self, x: u16, y: u16) -> Option<usize> {
        let slots = Rect::new(
            self.items.x,
            self.items.y,
            self.items.width,
            self.items.height - self.items.height % LIST_ITEM_ROWS,
        );
        slots
            .contains(x, y)
            .then(|| usize::from((y - self.items.y) / LIST_ITEM_ROWS))
    }
}

/// A bordered pane with a title row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    /// Whole pane, border included.
    pub outer: Rect,
    /// Title row inside the border.
    pub title: Rect,
    /// Rows below the title, inside border and padding.
    pub content: Rect,
}

impl BoxLayout {
    fn new(outer: Rect) -> Self {
        let inner = outer.inset(1, 1).inset(1, 0);
        let (title, content) = inner.split_vertical(1);
        Self {
            outer,
            title,
            content,
        }
    }

    /// The body area under `header_rows` rows of header block.
    pub fn body(&self, header_rows: u16) -> Rect {
        self.content.split_vertical(header_rows).1
    }
}

/// Dashboard: list on the left, preview on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    /// List pane.
    pub list: ListLayout,
    /// Preview pane (zero-width when collapsed).
    pub preview: BoxLayout,
    /// Status bar.
    pub status: Rect,
}

impl DashboardLayout {
    /// Where the preview body is drawn.
    pub fn preview_body(&self) -> Rect {
        self.preview.body(PREVIEW_HEADER_ROWS + BODY_MARGIN_ROWS)
    }
}

/// Lay out the dashboard for a terminal of the given size.
pub fn dashboard(width: u16, height: u16) -> DashboardLayout {
    let screen = screen(width, height);
    let (list_width, _) = dashboard_widths(width);
    let (list, preview) = screen.content.split_horizontal(list_width);
    DashboardLayout {
        list: ListLayout::new(list),
        preview: BoxLayout::new(preview),
        status: screen.status,
    }
}

/// Focused view: one bordered pane over the whole content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusedLayout {
    /// The message pane.
    pub pane: BoxLayout,
    /// Status bar.
    pub status: Rect,
}

impl FocusedLayout {
    /// Where the focused body is drawn.
    pub fn body(&self, has_cc: bool) -> Rect {
        self.pane.body(focused_header_rows(has_cc))
    }
}

/// Header block of the focused view: From, To, (Cc), Date, Subject, blank,
/// separator, blank.
pub const fn focused_header_rows(has_cc: bool) -> u16 {
    if has_cc {
        8
    } else {
        7
    }
}

/// Lay out the focused view for a terminal of the given size.
pub fn focused(width: u16, height: u16) -> FocusedLayout {
    let screen = screen(width, height);
    FocusedLayout {
        pane: BoxLayout::new(screen.content),
        status: screen.status,
    }
}

use chrono::NaiveDate;
use ratatui::layout::Rect;

use crate::model::{NoteId, SpatialView};
use crate::projection::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::util::date::{add_days, day_diff};

pub const MIN_SPLIT_PERCENT: u16 = 20;
pub const MAX_SPLIT_PERCENT: u16 = 85;

/// The pointer gesture in progress. Exactly one at a time; every variant
/// returns to `Idle` on release.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        view: SpatialView,
        last_col: u16,
        last_row: u16,
    },
    DraggingNote {
        view: SpatialView,
        id: NoteId,
        origin: (f64, f64),
        scale: f64,
        start_col: u16,
        start_row: u16,
        moved: bool,
    },
    DraggingBar {
        id: NoteId,
        origin_start: NaiveDate,
        origin_end: NaiveDate,
        start_col: u16,
    },
    ResizingBar {
        id: NoteId,
        origin_start: NaiveDate,
        origin_end: NaiveDate,
        start_col: u16,
    },
    LinkingSpatial {
        view: SpatialView,
        from: NoteId,
    },
    LinkingTimeline {
        from: NoteId,
    },
    ResizingSplit,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// The note a link is being drawn from, if any
    pub fn link_source(&self) -> Option<&NoteId> {
        match self {
            Gesture::LinkingSpatial { from, .. } | Gesture::LinkingTimeline { from } => Some(from),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "pan",
            Gesture::DraggingNote { .. } => "drag-note",
            Gesture::DraggingBar { .. } => "drag-bar",
            Gesture::ResizingBar { .. } => "resize-bar",
            Gesture::LinkingSpatial { .. } => "link-spatial",
            Gesture::LinkingTimeline { .. } => "link-timeline",
            Gesture::ResizingSplit => "resize-split",
        }
    }
}

/// A terminal pointer position with the Ctrl state at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub col: u16,
    pub row: u16,
    pub ctrl: bool,
}

impl Pointer {
    pub fn at(col: u16, row: u16) -> Pointer {
        Pointer {
            col,
            row,
            ctrl: false,
        }
    }

    pub fn in_rect(&self, area: Rect) -> bool {
        self.col >= area.x
            && self.col < area.x + area.width
            && self.row >= area.y
            && self.row < area.y + area.height
    }
}

/// Left-button and wheel events, decoupled from the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Pointer),
    Drag(Pointer),
    Up(Pointer),
    ScrollUp(Pointer),
    ScrollDown(Pointer),
}

/// Screen pixels covered by a cell delta
pub fn cells_to_px(d_cols: i32, d_rows: i32) -> (f64, f64) {
    (
        f64::from(d_cols) * CELL_WIDTH_PX,
        f64::from(d_rows) * CELL_HEIGHT_PX,
    )
}

/// Note position after dragging by a cell delta at `scale`
pub fn dragged_position(origin: (f64, f64), d_cols: i32, d_rows: i32, scale: f64) -> (f64, f64) {
    let (dx, dy) = cells_to_px(d_cols, d_rows);
    (origin.0 + dx / scale, origin.1 + dy / scale)
}

/// Shift a whole span by `delta` days
pub fn moved_span(start: NaiveDate, end: NaiveDate, delta: i64) -> (NaiveDate, NaiveDate) {
    (add_days(start, delta), add_days(end, delta))
}

/// New end when the resize handle moves `delta` days. The span never
/// drops below one day.
pub fn resized_end(start: NaiveDate, end: NaiveDate, delta: i64) -> NaiveDate {
    let duration = (day_diff(end, start) + 1 + delta).max(1);
    add_days(start, duration - 1)
}

/// Split percentage for a splitter dragged to `row` inside `content`
pub fn split_percent_at(content: Rect, row: u16) -> u16 {
    if content.height == 0 {
        return MIN_SPLIT_PERCENT;
    }
    let offset = u32::from(row.saturating_sub(content.y));
    let percent = offset * 100 / u32::from(content.height);
    (percent as u16).clamp(MIN_SPLIT_PERCENT, MAX_SPLIT_PERCENT)
}

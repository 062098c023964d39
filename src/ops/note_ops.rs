use chrono::NaiveDate;

use crate::model::{
    Board, ICONS, Link, Note, NoteId, NoteKind, SpatialView, Timeframe,
    WORKSHOP_CATEGORY,
};
use crate::util::date::{add_days, add_months};

/// Error type for note operations
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("a note cannot link to itself: {0}")]
    SelfLink(String),
}

pub const NEW_NOTE_TITLE: &str = "New";

/// Create a note at a model-space position on a spatial view. The vision
/// board creates year goals; the map creates plain tasks. Both are dated on
/// `reference`.
pub fn create_note(board: &mut Board, view: SpatialView, x: f64, y: f64, reference: NaiveDate) -> NoteId {
    let id = board.next_id();
    let mut note = Note::new(id.clone(), NEW_NOTE_TITLE);
    note.x = x;
    note.y = y;
    note.start = Some(reference);
    note.end = Some(reference);
    if view == SpatialView::Vision {
        note.kind = NoteKind::Goal {
            timeframe: Timeframe::Year,
        };
    }
    board.push_note(note);
    log::debug!("created note {} on {:?}", id, view);
    id
}

/// Append a link between two existing, distinct notes
pub fn add_link(board: &mut Board, from: &NoteId, to: &NoteId) -> Result<(), NoteError> {
    if from == to {
        return Err(NoteError::SelfLink(from.to_string()));
    }
    for id in [from, to] {
        if !board.contains(id) {
            return Err(NoteError::NotFound(id.to_string()));
        }
    }
    board.push_link(Link::new(from.clone(), to.clone()));
    Ok(())
}

/// Flip completion. Returns the new state, or `None` for an unknown id.
pub fn toggle_complete(board: &mut Board, id: &NoteId) -> Option<bool> {
    let note = board.find_mut(id)?;
    note.complete = !note.complete;
    Some(note.complete)
}

/// Kind after toggling the bottleneck flag; goal timeframes survive the trip
pub fn toggled_bottleneck(kind: NoteKind) -> NoteKind {
    match kind {
        NoteKind::Task => NoteKind::Bottleneck { goal: None },
        NoteKind::Goal { timeframe } => NoteKind::Bottleneck {
            goal: Some(timeframe),
        },
        NoteKind::Bottleneck { goal: Some(timeframe) } => NoteKind::Goal { timeframe },
        NoteKind::Bottleneck { goal: None } => NoteKind::Task,
    }
}

/// Category after toggling the workshop zone
pub fn toggled_workshop(note: &Note) -> Option<String> {
    if note.is_workshop() {
        None
    } else {
        Some(WORKSHOP_CATEGORY.to_string())
    }
}

/// Next icon in the palette; unknown icons restart the cycle
pub fn next_icon(icon: &str) -> String {
    let next = ICONS
        .iter()
        .position(|i| *i == icon)
        .map_or(0, |pos| (pos + 1) % ICONS.len());
    ICONS[next].to_string()
}

// ---------------------------------------------------------------------------
// Calendar goal slots
// ---------------------------------------------------------------------------

/// An editable goal slot on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSlot {
    Year,
    Month,
    /// The week starting on this Sunday
    Week(NaiveDate),
}

impl GoalSlot {
    pub fn timeframe(self) -> Timeframe {
        match self {
            GoalSlot::Year => Timeframe::Year,
            GoalSlot::Month => Timeframe::Month,
            GoalSlot::Week(_) => Timeframe::Week,
        }
    }
}

/// The goal occupying a slot: the first goal of that timeframe, and for
/// weeks, the one starting on the week's first day.
pub fn slot_goal(notes: &[Note], slot: GoalSlot) -> Option<&Note> {
    notes.iter().find(|n| match slot {
        GoalSlot::Week(week_start) => {
            n.goal_timeframe() == Some(Timeframe::Week) && n.start == Some(week_start)
        }
        other => n.goal_timeframe() == Some(other.timeframe()),
    })
}

/// Outcome of writing text into a calendar goal slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotWrite {
    Updated(NoteId),
    Created(NoteId),
    /// Blank text into an empty slot
    Ignored,
}

/// Write text into a calendar goal slot. An existing goal gets the new
/// title; an empty slot gets a new goal unless the text is blank.
pub fn write_goal_slot(board: &mut Board, slot: GoalSlot, text: &str, reference: NaiveDate) -> SlotWrite {
    if let Some(id) = slot_goal(&board.notes, slot).map(|n| n.id.clone()) {
        if let Some(note) = board.find_mut(&id) {
            note.title = text.to_string();
        }
        return SlotWrite::Updated(id);
    }
    if text.trim().is_empty() {
        return SlotWrite::Ignored;
    }

    let (start, end) = match slot {
        GoalSlot::Week(week_start) => (week_start, add_days(week_start, 6)),
        GoalSlot::Year => (reference, add_months(reference, 12)),
        GoalSlot::Month => (reference, add_months(reference, 1)),
    };
    let timeframe = slot.timeframe();
    let offset = board.notes.len() as f64 * 20.0;
    let id = board.next_id();
    let mut note = Note::new(id.clone(), text);
    note.x = 100.0 + offset;
    note.y = 100.0 + offset;
    note.start = Some(start);
    note.end = Some(end);
    note.kind = NoteKind::Goal { timeframe };
    note.icon = timeframe.icon().to_string();
    board.push_note(note);
    log::info!("calendar created {} goal {}", timeframe.as_str(), id);
    SlotWrite::Created(id)
}

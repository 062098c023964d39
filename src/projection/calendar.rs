use chrono::{Datelike, NaiveDate};

use crate::model::{ExternalEvent, Member, Note, NoteId, Timeframe};
use crate::ops::note_ops::{GoalSlot, slot_goal};
use crate::util::date::{add_days, week_start_sunday};

pub const CALENDAR_WEEKS: usize = 5;

/// A goal shown in a calendar slot
#[derive(Debug, Clone, PartialEq)]
pub struct GoalRef {
    pub id: NoteId,
    pub title: String,
}

impl GoalRef {
    fn of(note: Option<&Note>) -> Option<GoalRef> {
        note.map(|n| GoalRef {
            id: n.id.clone(),
            title: n.title.clone(),
        })
    }
}

/// A note active on a calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: NoteId,
    pub icon: String,
    pub title: String,
    pub member: Member,
    pub complete: bool,
}

/// An external feed event on a calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    pub title: String,
    pub details: String,
    pub high_confidence: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// The real wall-clock day, independent of navigation
    pub is_today: bool,
    pub entries: Vec<CalendarEntry>,
    pub events: Vec<EventMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarWeek {
    pub start: NaiveDate,
    pub goal: Option<GoalRef>,
    pub days: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarScene {
    pub reference: NaiveDate,
    pub year_goal: Option<GoalRef>,
    pub month_goal: Option<GoalRef>,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarScene {
    /// `YYYY/M` of the navigated month
    pub fn title(&self) -> String {
        format!("{}/{}", self.reference.year(), self.reference.month())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.start)
    }

    pub fn goal(&self, timeframe: Timeframe) -> Option<&GoalRef> {
        match timeframe {
            Timeframe::Year => self.year_goal.as_ref(),
            Timeframe::Month => self.month_goal.as_ref(),
            Timeframe::Week => None,
        }
    }
}

/// Five weeks starting from the Sunday on or before `reference`
pub fn project_calendar(
    notes: &[Note],
    events: &[ExternalEvent],
    reference: NaiveDate,
    real_today: NaiveDate,
) -> CalendarScene {
    let first = week_start_sunday(reference);
    let weeks = (0..CALENDAR_WEEKS)
        .map(|w| {
            let start = add_days(first, 7 * w as i64);
            let days = (0..7)
                .map(|i| {
                    let date = add_days(start, i);
                    calendar_cell(notes, events, date, real_today)
                })
                .collect();
            CalendarWeek {
                start,
                goal: GoalRef::of(slot_goal(notes, GoalSlot::Week(start))),
                days,
            }
        })
        .collect();

    CalendarScene {
        reference,
        year_goal: GoalRef::of(slot_goal(notes, GoalSlot::Year)),
        month_goal: GoalRef::of(slot_goal(notes, GoalSlot::Month)),
        weeks,
    }
}

fn calendar_cell(
    notes: &[Note],
    events: &[ExternalEvent],
    date: NaiveDate,
    real_today: NaiveDate,
) -> CalendarCell {
    let entries = notes
        .iter()
        .filter(|n| !n.is_goal() && n.active_on(date))
        .map(|n| CalendarEntry {
            id: n.id.clone(),
            icon: n.icon.clone(),
            title: n.title.clone(),
            member: n.member,
            complete: n.complete,
        })
        .collect();
    let events = events
        .iter()
        .filter(|e| e.date() == Some(date))
        .map(|e| EventMarker {
            title: e.title.clone(),
            details: e.extended_props.details.clone(),
            high_confidence: e.is_high_confidence(),
        })
        .collect();
    CalendarCell {
        date,
        is_today: date == real_today,
        entries,
        events,
    }
}

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::{Member, Note, NoteId, TimelineConfig};
use crate::util::date::{add_days, day_diff};

use super::spatial::CardStyle;

/// Days shown after the reference date
pub const HORIZON_DAYS: i64 = 60;
pub const MIN_DAY_WIDTH: u16 = 3;
pub const MAX_DAY_WIDTH: u16 = 12;

/// Timeline geometry and filtering, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    pub day_width: u16,
    pub lead_days: i64,
    pub label_width: u16,
    pub show_goals: bool,
}

impl TimelineOptions {
    pub fn from_config(config: &TimelineConfig) -> Self {
        TimelineOptions {
            day_width: config.day_width.clamp(MIN_DAY_WIDTH, MAX_DAY_WIDTH),
            lead_days: config.lead_days.max(0),
            label_width: config.label_width,
            show_goals: config.show_goals,
        }
    }

    /// Left edge and width of a bar spanning `start..=end`
    pub fn bar_geometry(&self, start: NaiveDate, end: NaiveDate, reference: NaiveDate) -> (i64, i64) {
        let dw = i64::from(self.day_width);
        let left = i64::from(self.label_width) + (day_diff(start, reference) + self.lead_days) * dw;
        let days = (day_diff(end, start) + 1).max(1);
        (left, days * dw)
    }

    /// Whole-day delta for a horizontal drag of `delta_cells`. Half a day
    /// rounds toward later dates in both directions.
    pub fn day_delta(&self, delta_cells: i32) -> i64 {
        (f64::from(delta_cells) / f64::from(self.day_width) + 0.5).floor() as i64
    }
}

impl Default for TimelineOptions {
    fn default() -> Self {
        TimelineOptions::from_config(&TimelineConfig::default())
    }
}

/// One header column
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub left: i64,
    pub weekday: Weekday,
    pub is_reference: bool,
}

impl DayColumn {
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// One timeline row
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub id: NoteId,
    pub title: String,
    pub icon: String,
    pub member: Member,
    pub style: CardStyle,
    pub complete: bool,
    pub selected: bool,
    pub workshop: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub left: i64,
    pub width: i64,
}

/// Which part of a row a column falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPart {
    Label,
    LinkHandle,
    Body,
    ResizeHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    pub reference: NaiveDate,
    pub options: TimelineOptions,
    pub header: Vec<DayColumn>,
    pub bars: Vec<Bar>,
}

fn zone_rank(note: &Note) -> u8 {
    if note.is_workshop() { 1 } else { 0 }
}

/// Project dated notes onto the timeline. Booth rows come before workshop
/// rows, each ordered by start date.
pub fn project_timeline(
    notes: &[Note],
    reference: NaiveDate,
    options: TimelineOptions,
    selected: Option<&NoteId>,
) -> TimelineScene {
    let mut rows: Vec<&Note> = notes
        .iter()
        .filter(|n| n.start.is_some())
        .filter(|n| options.show_goals || (!n.is_goal() && !n.is_bottleneck()))
        .collect();
    rows.sort_by_key(|n| (zone_rank(n), n.start));

    let bars = rows
        .into_iter()
        .filter_map(|n| {
            let start = n.start?;
            let end = n.end_or_start()?;
            let (left, width) = options.bar_geometry(start, end, reference);
            Some(Bar {
                id: n.id.clone(),
                title: n.title.clone(),
                icon: n.icon.clone(),
                member: n.member,
                style: CardStyle::of(n),
                complete: n.complete,
                selected: selected == Some(&n.id),
                workshop: n.is_workshop(),
                start,
                end,
                left,
                width,
            })
        })
        .collect();

    let dw = i64::from(options.day_width);
    let header = (-options.lead_days..HORIZON_DAYS)
        .map(|offset| {
            let date = add_days(reference, offset);
            DayColumn {
                date,
                left: i64::from(options.label_width) + (offset + options.lead_days) * dw,
                weekday: date.weekday(),
                is_reference: offset == 0,
            }
        })
        .collect();

    TimelineScene {
        reference,
        options,
        header,
        bars,
    }
}

impl TimelineScene {
    pub fn bar(&self, id: &NoteId) -> Option<&Bar> {
        self.bars.iter().find(|b| &b.id == id)
    }

    /// Re-date one bar in place; row order is left alone until the next
    /// full projection. Returns false when the bar is not shown.
    pub fn patch_bar(&mut self, id: &NoteId, start: NaiveDate, end: NaiveDate) -> bool {
        let reference = self.reference;
        let options = self.options;
        let Some(bar) = self.bars.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        let (left, width) = options.bar_geometry(start, end, reference);
        bar.start = start;
        bar.end = end;
        bar.left = left;
        bar.width = width;
        true
    }

    /// The bar on `row` and the part under `col`. Columns are relative to
    /// the timeline's left edge.
    pub fn hit(&self, row: usize, col: i64) -> Option<(NoteId, BarPart)> {
        let bar = self.bars.get(row)?;
        let part = if col < i64::from(self.options.label_width) {
            BarPart::Label
        } else if col == bar.left {
            BarPart::LinkHandle
        } else if col == bar.left + bar.width - 1 {
            BarPart::ResizeHandle
        } else if col > bar.left && col < bar.left + bar.width {
            BarPart::Body
        } else {
            return None;
        };
        Some((bar.id.clone(), part))
    }
}

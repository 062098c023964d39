//! Auto-arrangement of notes into fixed zones.
//!
//! Zones stack top to bottom: goals, bottlenecks, then the workshop and booth
//! task grids side by side. Running `arrange` twice without changes to the
//! board produces the same positions.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{Board, Note};
use crate::util::date::day_diff;

/// A row-major grid anchored at `anchor_x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub anchor_x: f64,
    pub cols: usize,
    pub x_step: f64,
    pub y_step: f64,
}

pub const TOP_Y: f64 = 50.0;

/// Goal cards are drawn larger, so their grid is wider
pub const GOAL_ZONE: Zone = Zone {
    anchor_x: 100.0,
    cols: 3,
    x_step: 360.0,
    y_step: 240.0,
};
pub const GOAL_GAP: f64 = 50.0;

pub const BOTTLENECK_ZONE: Zone = Zone {
    anchor_x: 100.0,
    cols: 4,
    x_step: 220.0,
    y_step: 180.0,
};
pub const BOTTLENECK_GAP: f64 = 80.0;

pub const WORKSHOP_ZONE: Zone = Zone {
    anchor_x: 50.0,
    cols: 2,
    x_step: 220.0,
    y_step: 160.0,
};

pub const BOOTH_ZONE: Zone = Zone {
    anchor_x: 600.0,
    cols: 2,
    x_step: 220.0,
    y_step: 160.0,
};

/// Note indices per zone, in placement order
#[derive(Debug, Default, PartialEq)]
pub struct Buckets {
    pub goals: Vec<usize>,
    pub bottlenecks: Vec<usize>,
    pub workshop: Vec<usize>,
    pub booth: Vec<usize>,
}

/// Partition notes into the four disjoint zones. Non-goal zones are sorted by
/// start date; notes without one sort as if they started on `reference`.
pub fn bucket_notes(notes: &[Note], reference: NaiveDate) -> Buckets {
    let mut buckets = Buckets::default();
    for (i, note) in notes.iter().enumerate() {
        if note.is_bottleneck() {
            buckets.bottlenecks.push(i);
        } else if note.is_goal() {
            buckets.goals.push(i);
        } else if note.is_workshop() {
            buckets.workshop.push(i);
        } else {
            buckets.booth.push(i);
        }
    }
    let by_start = |a: &usize, b: &usize| -> Ordering {
        let sa = notes[*a].start.unwrap_or(reference);
        let sb = notes[*b].start.unwrap_or(reference);
        day_diff(sa, sb).cmp(&0)
    };
    buckets.bottlenecks.sort_by(by_start);
    buckets.workshop.sort_by(by_start);
    buckets.booth.sort_by(by_start);
    buckets
}

/// Place notes on a zone grid starting at `top`. Returns the height used.
fn place(notes: &mut [Note], indices: &[usize], zone: Zone, top: f64) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    for (slot, &i) in indices.iter().enumerate() {
        notes[i].x = zone.anchor_x + (slot % zone.cols) as f64 * zone.x_step;
        notes[i].y = top + (slot / zone.cols) as f64 * zone.y_step;
    }
    indices.len().div_ceil(zone.cols) as f64 * zone.y_step
}

/// Rewrite every note's `x, y` into its zone. Nothing else is touched.
pub fn arrange(board: &mut Board, reference: NaiveDate) {
    let buckets = bucket_notes(&board.notes, reference);
    let notes = &mut board.notes;

    let mut y = TOP_Y;
    let goals_h = place(notes, &buckets.goals, GOAL_ZONE, y);
    if goals_h > 0.0 {
        y += goals_h + GOAL_GAP;
    }
    let bottleneck_h = place(notes, &buckets.bottlenecks, BOTTLENECK_ZONE, y);
    if bottleneck_h > 0.0 {
        y += bottleneck_h + BOTTLENECK_GAP;
    }
    place(notes, &buckets.workshop, WORKSHOP_ZONE, y);
    place(notes, &buckets.booth, BOOTH_ZONE, y);

    log::info!(
        "layout: {} goals, {} bottlenecks, {} workshop, {} booth",
        buckets.goals.len(),
        buckets.bottlenecks.len(),
        buckets.workshop.len(),
        buckets.booth.len()
    );
}

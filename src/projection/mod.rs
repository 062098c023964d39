//! Derived, render-ready views of the board.
//!
//! Every scene is a pure function of the board plus session state. A full
//! re-projection runs after any discrete change; during a drag the
//! controller patches the affected scenes instead and reprojects once on
//! release.

pub mod calendar;
pub mod spatial;
pub mod timeline;

pub use calendar::{CalendarScene, project_calendar};
pub use spatial::{SpatialHit, SpatialScene, project_spatial};
pub use timeline::{BarPart, TimelineOptions, TimelineScene, project_timeline};

use chrono::NaiveDate;

use crate::model::{Board, ExternalEvent, Note, NoteId, SpatialView, Viewport, Viewports};

/// Screen pixels per terminal column
pub const CELL_WIDTH_PX: f64 = 10.0;
/// Screen pixels per terminal row
pub const CELL_HEIGHT_PX: f64 = 20.0;

/// Everything a full projection reads
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub board: &'a Board,
    pub viewports: &'a Viewports,
    pub selected: Option<&'a NoteId>,
    pub reference: NaiveDate,
    pub real_today: NaiveDate,
    pub timeline: TimelineOptions,
    pub events: &'a [ExternalEvent],
}

/// All derived scenes, rebuilt together
#[derive(Debug, Clone, PartialEq)]
pub struct Scenes {
    pub map: SpatialScene,
    pub vision: SpatialScene,
    pub timeline: TimelineScene,
    pub calendar: CalendarScene,
}

impl Scenes {
    pub fn project(input: &ProjectionInput) -> Scenes {
        Scenes {
            map: project_spatial(
                input.board,
                SpatialView::Map,
                &input.viewports.map,
                input.selected,
            ),
            vision: project_spatial(
                input.board,
                SpatialView::Vision,
                &input.viewports.vision,
                input.selected,
            ),
            timeline: project_timeline(
                &input.board.notes,
                input.reference,
                input.timeline,
                input.selected,
            ),
            calendar: project_calendar(
                &input.board.notes,
                input.events,
                input.reference,
                input.real_today,
            ),
        }
    }

    pub fn reproject(&mut self, input: &ProjectionInput) {
        *self = Scenes::project(input);
    }

    pub fn spatial(&self, view: SpatialView) -> &SpatialScene {
        match view {
            SpatialView::Map => &self.map,
            SpatialView::Vision => &self.vision,
        }
    }

    /// Follow a note being dragged on either canvas
    pub fn patch_note_position(&mut self, note: &Note) {
        self.map.patch_card_position(&note.id, note.x, note.y);
        self.vision.patch_card_position(&note.id, note.x, note.y);
    }

    /// Follow a bar being moved or resized
    pub fn patch_note_dates(&mut self, note: &Note) {
        if let (Some(start), Some(end)) = (note.start, note.end_or_start()) {
            self.timeline.patch_bar(&note.id, start, end);
        }
    }

    pub fn patch_viewport(&mut self, view: SpatialView, viewport: &Viewport) {
        match view {
            SpatialView::Map => self.map.patch_viewport(viewport),
            SpatialView::Vision => self.vision.patch_viewport(viewport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Link, NoteKind, Timeframe};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn board() -> Board {
        let mut goal = Note::new(NoteId::from("g"), "Goal");
        goal.kind = NoteKind::Goal {
            timeframe: Timeframe::Year,
        };
        goal.x = 400.0;
        let mut task = Note::new(NoteId::from("t"), "Task");
        task.start = Some(d("2026-01-10"));
        task.end = Some(d("2026-01-12"));
        Board::new(
            vec![goal, task],
            vec![Link::new(NoteId::from("t"), NoteId::from("g"))],
        )
    }

    fn project(board: &Board, viewports: &Viewports) -> Scenes {
        Scenes::project(&ProjectionInput {
            board,
            viewports,
            selected: None,
            reference: d("2026-01-10"),
            real_today: d("2026-01-10"),
            timeline: TimelineOptions::default(),
            events: &[],
        })
    }

    #[test]
    fn projection_is_deterministic() {
        let b = board();
        let vps = Viewports::default();
        assert_eq!(project(&b, &vps), project(&b, &vps));
    }

    #[test]
    fn drag_patches_agree_with_reprojection() {
        let mut b = board();
        let vps = Viewports::default();
        let mut scenes = project(&b, &vps);

        let id = NoteId::from("g");
        {
            let goal = b.find_mut(&id).unwrap();
            goal.x = 10.0;
            goal.y = 500.0;
        }
        scenes.patch_note_position(b.find(&id).unwrap());

        let id = NoteId::from("t");
        {
            let task = b.find_mut(&id).unwrap();
            task.end = Some(d("2026-01-14"));
        }
        scenes.patch_note_dates(b.find(&id).unwrap());

        assert_eq!(scenes, project(&b, &vps));
    }

    #[test]
    fn viewport_patch_agrees_with_reprojection() {
        let b = board();
        let mut vps = Viewports::default();
        let mut scenes = project(&b, &vps);
        vps.map.pan(30.0, -20.0);
        vps.map.s = 2.0;
        scenes.patch_viewport(SpatialView::Map, &vps.map);
        assert_eq!(scenes, project(&b, &vps));
    }
}

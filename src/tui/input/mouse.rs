use std::time::Instant;

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::model::{NoteId, SpatialView, ZoomDirection};
use crate::ops::note_ops::{GoalSlot, NEW_NOTE_TITLE, add_link, create_note, toggle_complete};
use crate::projection::{BarPart, SpatialHit};
use crate::tui::app::{App, ConfirmAction, DOUBLE_CLICK, EditTarget, LastClick, Mode};
use crate::tui::gesture::{
    Gesture, Pointer, PointerEvent, cells_to_px, dragged_position, moved_span, resized_end,
    split_percent_at,
};
use crate::tui::render::calendar_view::{CalendarHit, CalendarLayout};
use crate::tui::render::timeline_view::HEADER_ROWS;

use super::navigate::scroll_timeline;

/// Translate a terminal mouse event; other buttons are ignored
pub fn pointer_event(mouse: MouseEvent) -> Option<PointerEvent> {
    let p = Pointer {
        col: mouse.column,
        row: mouse.row,
        ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL),
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down(p)),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Drag(p)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(p)),
        MouseEventKind::ScrollUp => Some(PointerEvent::ScrollUp(p)),
        MouseEventKind::ScrollDown => Some(PointerEvent::ScrollDown(p)),
        _ => None,
    }
}

pub fn handle_pointer(app: &mut App, ev: PointerEvent, now: Instant) {
    match ev {
        PointerEvent::Down(p) => pointer_down(app, p, now),
        PointerEvent::Drag(p) => pointer_drag(app, p),
        PointerEvent::Up(p) => pointer_up(app, p),
        PointerEvent::ScrollUp(p) => wheel(app, p, ZoomDirection::In),
        PointerEvent::ScrollDown(p) => wheel(app, p, ZoomDirection::Out),
    }
}

// ----- press -----

fn pointer_down(app: &mut App, p: Pointer, now: Instant) {
    if app.show_help {
        app.show_help = false;
        return;
    }
    if app.mode != Mode::Navigate || !app.gesture.is_idle() {
        return;
    }

    let double = app.last_click.is_some_and(|c| {
        c.col == p.col && c.row == p.row && now.duration_since(c.at) <= DOUBLE_CLICK
    });
    app.last_click = if double {
        None
    } else {
        Some(LastClick {
            col: p.col,
            row: p.row,
            at: now,
        })
    };
    app.status_message = None;

    let areas = app.areas;
    if let (Some(view), Some(canvas)) = (app.view.spatial(), areas.canvas)
        && p.in_rect(canvas)
    {
        spatial_down(app, view, canvas, p, double);
    } else if let Some(splitter) = areas.splitter
        && p.in_rect(splitter)
    {
        start_gesture(app, Gesture::ResizingSplit);
    } else if let Some(timeline) = areas.timeline
        && p.in_rect(timeline)
    {
        timeline_down(app, timeline, p, double);
    } else if let Some(calendar) = areas.calendar
        && p.in_rect(calendar)
    {
        calendar_down(app, calendar, p);
    }
}

fn start_gesture(app: &mut App, gesture: Gesture) {
    log::debug!("gesture {} started", gesture.name());
    app.gesture = gesture;
}

fn canvas_cell(canvas: Rect, p: Pointer) -> (i32, i32) {
    (
        i32::from(p.col) - i32::from(canvas.x),
        i32::from(p.row) - i32::from(canvas.y),
    )
}

fn spatial_down(app: &mut App, view: SpatialView, canvas: Rect, p: Pointer, double: bool) {
    let (col, row) = canvas_cell(canvas, p);
    let hit = app.scenes.spatial(view).hit(col, row);

    if double {
        match hit {
            SpatialHit::Body(id) | SpatialHit::LinkHandle(id) | SpatialHit::CompleteToggle(id) => {
                edit_title(app, id);
            }
            SpatialHit::Empty => {
                let (px, py) = cells_to_px(col, row);
                let (mx, my) = app.viewports.get(view).screen_to_model(px, py);
                let id = create_note(&mut app.board, view, mx, my, app.reference);
                app.dirty = true;
                app.selected = Some(id.clone());
                app.reproject();
                app.begin_edit(EditTarget::Title(id), NEW_NOTE_TITLE);
            }
        }
        return;
    }

    match hit {
        SpatialHit::LinkHandle(from) => {
            app.select(Some(from.clone()));
            start_gesture(app, Gesture::LinkingSpatial { view, from });
        }
        SpatialHit::CompleteToggle(id) => flip_complete(app, &id),
        SpatialHit::Body(id) => {
            let Some(origin) = app.board.find(&id).map(|n| (n.x, n.y)) else {
                return;
            };
            let scale = app.viewports.get(view).s;
            app.select(Some(id.clone()));
            start_gesture(
                app,
                Gesture::DraggingNote {
                    view,
                    id,
                    origin,
                    scale,
                    start_col: p.col,
                    start_row: p.row,
                    moved: false,
                },
            );
        }
        SpatialHit::Empty => start_gesture(
            app,
            Gesture::Panning {
                view,
                last_col: p.col,
                last_row: p.row,
            },
        ),
    }
}

/// Row index into the timeline scene under the pointer, below the header
fn timeline_row(app: &App, timeline: Rect, p: Pointer) -> Option<usize> {
    let offset = p.row.checked_sub(timeline.y + HEADER_ROWS)?;
    Some(usize::from(offset) + app.timeline_scroll)
}

fn timeline_target(app: &App, timeline: Rect, p: Pointer) -> Option<(NoteId, BarPart)> {
    let row = timeline_row(app, timeline, p)?;
    let col = i64::from(p.col) - i64::from(timeline.x);
    app.scenes.timeline.hit(row, col)
}

fn timeline_down(app: &mut App, timeline: Rect, p: Pointer, double: bool) {
    let Some((id, part)) = timeline_target(app, timeline, p) else {
        return;
    };

    if p.ctrl && part != BarPart::Label {
        flip_complete(app, &id);
        return;
    }
    if double {
        edit_title(app, id);
        return;
    }

    app.select(Some(id.clone()));
    let Some(bar) = app.scenes.timeline.bar(&id) else {
        return;
    };
    let (origin_start, origin_end) = (bar.start, bar.end);
    match part {
        BarPart::Label => {}
        BarPart::LinkHandle => start_gesture(app, Gesture::LinkingTimeline { from: id }),
        BarPart::Body => start_gesture(
            app,
            Gesture::DraggingBar {
                id,
                origin_start,
                origin_end,
                start_col: p.col,
            },
        ),
        BarPart::ResizeHandle => start_gesture(
            app,
            Gesture::ResizingBar {
                id,
                origin_start,
                origin_end,
                start_col: p.col,
            },
        ),
    }
}

fn calendar_down(app: &mut App, calendar: Rect, p: Pointer) {
    let layout = CalendarLayout::new(calendar);
    let Some(hit) = layout.hit(p.col, p.row) else {
        return;
    };
    match hit {
        CalendarHit::YearSlot => edit_slot(app, GoalSlot::Year),
        CalendarHit::MonthSlot => edit_slot(app, GoalSlot::Month),
        CalendarHit::WeekSlot(week) => {
            if let Some(start) = app.scenes.calendar.weeks.get(week).map(|w| w.start) {
                edit_slot(app, GoalSlot::Week(start));
            }
        }
        CalendarHit::Day { week, day, line } => {
            let Some(cell) = app
                .scenes
                .calendar
                .weeks
                .get(week)
                .and_then(|w| w.days.get(day))
            else {
                return;
            };
            let Some(index) = line.checked_sub(1) else {
                return;
            };
            if let Some(entry) = cell.entries.get(index) {
                let id = entry.id.clone();
                app.select(Some(id));
            } else if let Some(event) = cell.events.get(index - cell.entries.len()) {
                let title = event.title.clone();
                app.begin_confirm(
                    format!("{}: request stock update?", title),
                    ConfirmAction::AcknowledgeEvent { title },
                );
            }
        }
    }
}

fn edit_slot(app: &mut App, slot: GoalSlot) {
    let initial = crate::ops::note_ops::slot_goal(&app.board.notes, slot)
        .map(|n| n.title.clone())
        .unwrap_or_default();
    app.begin_edit(EditTarget::Slot(slot), &initial);
}

fn edit_title(app: &mut App, id: NoteId) {
    let Some(title) = app.board.find(&id).map(|n| n.title.clone()) else {
        return;
    };
    app.select(Some(id.clone()));
    app.begin_edit(EditTarget::Title(id), &title);
}

fn flip_complete(app: &mut App, id: &NoteId) {
    if toggle_complete(&mut app.board, id).is_some() {
        app.dirty = true;
        app.reproject();
    }
}

// ----- drag -----

fn pointer_drag(app: &mut App, p: Pointer) {
    match app.gesture.clone() {
        Gesture::Panning {
            view,
            last_col,
            last_row,
        } => {
            let d_cols = i32::from(p.col) - i32::from(last_col);
            let d_rows = i32::from(p.row) - i32::from(last_row);
            let (dx, dy) = cells_to_px(d_cols, d_rows);
            let vp = app.viewports.get_mut(view);
            vp.pan(dx, dy);
            let vp = *vp;
            app.scenes.patch_viewport(view, &vp);
            app.dirty = true;
            app.gesture = Gesture::Panning {
                view,
                last_col: p.col,
                last_row: p.row,
            };
        }
        Gesture::DraggingNote {
            id,
            origin,
            scale,
            start_col,
            start_row,
            ..
        } => {
            let d_cols = i32::from(p.col) - i32::from(start_col);
            let d_rows = i32::from(p.row) - i32::from(start_row);
            let (x, y) = dragged_position(origin, d_cols, d_rows, scale);
            let Some(note) = app.board.find_mut(&id) else {
                return;
            };
            note.x = x;
            note.y = y;
            app.scenes.patch_note_position(note);
            if let Gesture::DraggingNote { moved, .. } = &mut app.gesture {
                *moved = true;
            }
        }
        Gesture::DraggingBar {
            id,
            origin_start,
            origin_end,
            start_col,
        } => {
            let delta = app
                .timeline
                .day_delta(i32::from(p.col) - i32::from(start_col));
            let (start, end) = moved_span(origin_start, origin_end, delta);
            redate(app, &id, start, end);
        }
        Gesture::ResizingBar {
            id,
            origin_start,
            origin_end,
            start_col,
        } => {
            let delta = app
                .timeline
                .day_delta(i32::from(p.col) - i32::from(start_col));
            let end = resized_end(origin_start, origin_end, delta);
            redate(app, &id, origin_start, end);
        }
        Gesture::ResizingSplit => {
            app.split_percent = split_percent_at(app.areas.content, p.row);
        }
        Gesture::LinkingSpatial { .. } | Gesture::LinkingTimeline { .. } | Gesture::Idle => {}
    }
}

/// Live date change during a bar drag; the scene is patched, not rebuilt
fn redate(app: &mut App, id: &NoteId, start: chrono::NaiveDate, end: chrono::NaiveDate) {
    let Some(note) = app.board.find_mut(id) else {
        return;
    };
    if note.start == Some(start) && note.end_or_start() == Some(end) {
        return;
    }
    note.start = Some(start);
    note.end = Some(end);
    app.scenes.patch_note_dates(note);
    app.dirty = true;
}

// ----- release -----

fn pointer_up(app: &mut App, p: Pointer) {
    let gesture = std::mem::take(&mut app.gesture);
    match &gesture {
        Gesture::Idle => return,
        Gesture::Panning { .. } | Gesture::ResizingSplit => {}
        Gesture::DraggingNote { moved, .. } => {
            if *moved {
                app.dirty = true;
            }
        }
        Gesture::DraggingBar { .. } | Gesture::ResizingBar { .. } => app.reproject(),
        Gesture::LinkingSpatial { view, from } => {
            let target = match (app.view.spatial(), app.areas.canvas) {
                (Some(current), Some(canvas)) if current == *view && p.in_rect(canvas) => {
                    let (col, row) = canvas_cell(canvas, p);
                    match app.scenes.spatial(*view).hit(col, row) {
                        SpatialHit::Body(id)
                        | SpatialHit::LinkHandle(id)
                        | SpatialHit::CompleteToggle(id) => Some(id),
                        SpatialHit::Empty => None,
                    }
                }
                _ => None,
            };
            finish_link(app, from, target);
        }
        Gesture::LinkingTimeline { from } => {
            let target = app
                .areas
                .timeline
                .filter(|t| p.in_rect(*t))
                .and_then(|t| timeline_target(app, t, p))
                .map(|(id, _)| id);
            finish_link(app, from, target);
        }
    }
    log::debug!("gesture {} ended", gesture.name());
}

/// Link to a different note under the pointer; the source is always cleared
fn finish_link(app: &mut App, from: &NoteId, target: Option<NoteId>) {
    if let Some(to) = target
        && &to != from
    {
        match add_link(&mut app.board, from, &to) {
            Ok(()) => {
                app.dirty = true;
                app.notice(format!("linked {} \u{2192} {}", from, to));
            }
            Err(e) => app.notice(e.to_string()),
        }
    }
    app.reproject();
}

// ----- wheel -----

fn wheel(app: &mut App, p: Pointer, direction: ZoomDirection) {
    if !app.gesture.is_idle() {
        return;
    }
    if let (Some(view), Some(canvas)) = (app.view.spatial(), app.areas.canvas)
        && p.in_rect(canvas)
    {
        let vp = app.viewports.get_mut(view);
        vp.zoom(direction);
        let vp = *vp;
        app.scenes.patch_viewport(view, &vp);
        app.dirty = true;
    } else if app.areas.timeline.is_some_and(|t| p.in_rect(t)) {
        let step = match direction {
            ZoomDirection::In => -1,
            ZoomDirection::Out => 1,
        };
        scroll_timeline(app, step);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{EventProps, ExternalEvent, Note};
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::*;

    fn dated(id: &str, title: &str, start: &str, end: &str) -> Note {
        let mut n = note(id, title);
        n.start = Some(date(start));
        n.end = Some(date(end));
        n
    }

    /// Render once so the layout areas are known
    fn ready(notes: Vec<Note>) -> App {
        let mut app = app_with_notes(notes);
        render_app(&mut app, TERM_W, TERM_H);
        app
    }

    fn click(app: &mut App, col: u16, row: u16, now: Instant) {
        handle_pointer(app, PointerEvent::Down(Pointer::at(col, row)), now);
        handle_pointer(app, PointerEvent::Up(Pointer::at(col, row)), now);
    }

    fn drag(app: &mut App, from: (u16, u16), to: (u16, u16)) {
        let now = Instant::now();
        handle_pointer(app, PointerEvent::Down(Pointer::at(from.0, from.1)), now);
        handle_pointer(app, PointerEvent::Drag(Pointer::at(to.0, to.1)), now);
        handle_pointer(app, PointerEvent::Up(Pointer::at(to.0, to.1)), now);
    }

    #[test]
    fn dragging_a_card_moves_the_note() {
        let mut app = ready(vec![note("1", "Kiln")]);
        drag(&mut app, (10, 5), (13, 6));
        let n = app.board.find(&NoteId::from("1")).unwrap();
        assert_eq!((n.x, n.y), (30.0, 20.0));
        assert_eq!(app.selected, Some(NoteId::from("1")));
        assert!(app.dirty);
        assert!(app.gesture.is_idle());
        assert_eq!(app.scenes.map.cards[0].x, 30.0);
    }

    #[test]
    fn note_drag_keeps_scale_from_pointer_down() {
        let mut app = ready(vec![note("1", "Kiln")]);
        let now = Instant::now();
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(10, 5)), now);
        for _ in 0..8 {
            handle_pointer(&mut app, PointerEvent::ScrollUp(Pointer::at(50, 10)), now);
        }
        assert_eq!(app.viewports.map.s, 1.0);

        // A zoom from elsewhere mid-drag must not rescale the accumulated delta
        app.viewports.map.s = 2.0;
        handle_pointer(&mut app, PointerEvent::Drag(Pointer::at(13, 6)), now);
        handle_pointer(&mut app, PointerEvent::Up(Pointer::at(13, 6)), now);
        let n = app.board.find(&NoteId::from("1")).unwrap();
        assert_eq!((n.x, n.y), (30.0, 20.0));
    }

    #[test]
    fn pointer_down_during_bar_drag_is_ignored() {
        let mut other = note("2", "Glaze");
        other.x = 400.0;
        let mut app = ready(vec![dated("1", "Fire", "2026-01-10", "2026-01-12"), other]);
        let now = Instant::now();
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(52, 16)), now);
        assert_eq!(app.gesture.name(), "drag-bar");
        let selected = app.selected.clone();

        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(45, 5)), now);
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(60, 10)), now);
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(60, 10)), now);

        assert_eq!(app.gesture.name(), "drag-bar");
        assert_eq!(app.board.notes.len(), 2);
        assert_eq!(app.selected, selected);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn dragging_empty_canvas_pans() {
        let mut app = ready(vec![note("1", "Kiln")]);
        drag(&mut app, (50, 10), (52, 11));
        assert_eq!((app.viewports.map.x, app.viewports.map.y), (20.0, 20.0));
        assert_eq!(app.scenes.map.transform.translate_x, 20.0);
        let n = app.board.find(&NoteId::from("1")).unwrap();
        assert_eq!((n.x, n.y), (0.0, 0.0));
    }

    #[test]
    fn check_box_toggles_completion() {
        let mut app = ready(vec![note("1", "Kiln")]);
        click(&mut app, 3, 3, Instant::now());
        assert!(app.board.notes[0].complete);
        assert!(app.scenes.map.cards[0].complete);
    }

    #[test]
    fn link_handle_drag_links_two_cards() {
        let mut other = note("2", "Glaze");
        other.x = 400.0;
        let mut app = ready(vec![note("1", "Kiln"), other]);
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(1, 3)), Instant::now());
        assert_eq!(app.gesture.link_source(), Some(&NoteId::from("1")));
        handle_pointer(&mut app, PointerEvent::Up(Pointer::at(45, 5)), Instant::now());
        assert!(app.board.has_link(&NoteId::from("1"), &NoteId::from("2")));
        assert_eq!(app.scenes.map.connectors.len(), 1);
        assert!(app.gesture.is_idle());
    }

    #[test]
    fn link_dropped_on_empty_space_is_discarded() {
        let mut app = ready(vec![note("1", "Kiln")]);
        handle_pointer(&mut app, PointerEvent::Down(Pointer::at(1, 3)), Instant::now());
        handle_pointer(&mut app, PointerEvent::Up(Pointer::at(60, 10)), Instant::now());
        assert!(app.board.links.is_empty());
        assert!(app.gesture.link_source().is_none());
        assert!(!app.dirty);
    }

    #[test]
    fn double_click_on_empty_canvas_creates_note() {
        let mut app = ready(vec![]);
        let t = Instant::now();
        click(&mut app, 50, 10, t);
        handle_pointer(
            &mut app,
            PointerEvent::Down(Pointer::at(50, 10)),
            t + Duration::from_millis(100),
        );
        assert_eq!(app.board.notes.len(), 1);
        let n = &app.board.notes[0];
        assert_eq!((n.x, n.y), (500.0, 160.0));
        assert_eq!(n.start, Some(app.reference));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit.as_ref().unwrap().buffer, NEW_NOTE_TITLE);
    }

    #[test]
    fn slow_second_click_is_not_a_double_click() {
        let mut app = ready(vec![]);
        let t = Instant::now();
        click(&mut app, 50, 10, t);
        click(&mut app, 50, 10, t + Duration::from_millis(900));
        assert!(app.board.notes.is_empty());
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn resize_handle_extends_end_date() {
        let mut app = ready(vec![dated("1", "Fire", "2026-01-10", "2026-01-12")]);
        // Timeline starts at row 15; first bar row is 16. Bar spans cols 48..=59.
        drag(&mut app, (59, 16), (67, 16));
        let n = app.board.find(&NoteId::from("1")).unwrap();
        assert_eq!(n.start, Some(date("2026-01-10")));
        assert_eq!(n.end, Some(date("2026-01-14")));
        assert!(app.dirty);
        assert_eq!(app.scenes.timeline.bars[0].end, date("2026-01-14"));
    }

    #[test]
    fn dragging_bar_body_shifts_both_dates() {
        let mut app = ready(vec![dated("1", "Fire", "2026-01-10", "2026-01-12")]);
        drag(&mut app, (52, 16), (48, 16));
        let n = app.board.find(&NoteId::from("1")).unwrap();
        assert_eq!(n.start, Some(date("2026-01-09")));
        assert_eq!(n.end, Some(date("2026-01-11")));
    }

    #[test]
    fn ctrl_click_on_bar_toggles_completion() {
        let mut app = ready(vec![dated("1", "Fire", "2026-01-10", "2026-01-12")]);
        let p = Pointer {
            ctrl: true,
            ..Pointer::at(52, 16)
        };
        handle_pointer(&mut app, PointerEvent::Down(p), Instant::now());
        assert!(app.board.notes[0].complete);
        assert!(app.gesture.is_idle());
    }

    #[test]
    fn splitter_drag_changes_split() {
        let mut app = ready(vec![]);
        drag(&mut app, (10, 14), (10, 20));
        assert_eq!(app.split_percent, 85);
    }

    #[test]
    fn wheel_zooms_canvas_only() {
        let mut app = ready(vec![]);
        handle_pointer(&mut app, PointerEvent::ScrollUp(Pointer::at(50, 10)), Instant::now());
        assert!((app.viewports.map.s - 1.1).abs() < 1e-9);
        handle_pointer(&mut app, PointerEvent::ScrollUp(Pointer::at(50, 18)), Instant::now());
        assert!((app.viewports.map.s - 1.1).abs() < 1e-9);
    }

    #[test]
    fn calendar_event_click_asks_for_confirmation() {
        let mut app = app_with_notes(vec![]);
        app.view = View::Calendar;
        app.events = vec![ExternalEvent {
            title: "Clay".into(),
            start: "2026-01-12".into(),
            extended_props: EventProps::default(),
        }];
        app.reproject();
        render_app(&mut app, 100, 30);
        // Week 1 (Jan 11) starts at row 10; Monday is the second day column
        click(&mut app, 25, 11, Instant::now());
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(
            app.confirm.as_ref().unwrap().message,
            "Clay: request stock update?"
        );
        assert!(app.board.notes.is_empty());
    }

    #[test]
    fn calendar_year_slot_click_edits_slot() {
        let mut app = app_with_notes(vec![]);
        app.view = View::Calendar;
        render_app(&mut app, 100, 30);
        click(&mut app, 20, 3, Instant::now());
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(
            app.edit.as_ref().unwrap().target,
            EditTarget::Slot(GoalSlot::Year)
        );
    }
}

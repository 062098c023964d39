use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{NoteField, NoteId, ZoomDirection};
use crate::ops::layout::arrange;
use crate::ops::note_ops::{GoalSlot, next_icon, toggled_bottleneck, toggled_workshop};
use crate::projection::timeline::{MAX_DAY_WIDTH, MIN_DAY_WIDTH};
use crate::tui::app::{App, ConfirmAction, EditTarget, View};
use crate::util::date::format_date;

/// Cells moved per arrow-key pan
const PAN_STEP_COLS: i32 = 4;
const PAN_STEP_ROWS: i32 = 2;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.should_quit = true,
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Views
        (_, KeyCode::Char('1')) => switch_view(app, View::Map),
        (_, KeyCode::Char('2')) => switch_view(app, View::Goals),
        (_, KeyCode::Char('3')) => switch_view(app, View::Calendar),
        (_, KeyCode::Tab) => switch_view(app, app.view.next()),

        // Canvas
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => zoom(app, ZoomDirection::In),
        (_, KeyCode::Char('-')) => zoom(app, ZoomDirection::Out),
        (_, KeyCode::Left) => pan(app, PAN_STEP_COLS, 0),
        (_, KeyCode::Right) => pan(app, -PAN_STEP_COLS, 0),
        (_, KeyCode::Up) => pan(app, 0, PAN_STEP_ROWS),
        (_, KeyCode::Down) => pan(app, 0, -PAN_STEP_ROWS),

        // Timeline
        (_, KeyCode::Char('[')) => change_day_width(app, -1),
        (_, KeyCode::Char(']')) => change_day_width(app, 1),
        (_, KeyCode::Char('g')) => {
            app.timeline.show_goals = !app.timeline.show_goals;
            app.reproject();
            let state = if app.timeline.show_goals { "shown" } else { "hidden" };
            app.notice(format!("goals {} on timeline", state));
        }
        (_, KeyCode::PageDown) => scroll_timeline(app, 5),
        (_, KeyCode::PageUp) => scroll_timeline(app, -5),

        // Selection
        (_, KeyCode::Char('j')) => cycle_selection(app, 1),
        (_, KeyCode::Char('k')) => cycle_selection(app, -1),
        (_, KeyCode::Esc) => app.select(None),

        // Note fields
        (_, KeyCode::Char('e')) | (_, KeyCode::Enter) => edit_selected(app, Field::Title),
        (_, KeyCode::Char('M')) => edit_selected(app, Field::Memo),
        (_, KeyCode::Char('d')) => edit_selected(app, Field::Start),
        (_, KeyCode::Char('D')) => edit_selected(app, Field::End),
        (_, KeyCode::Char('m')) => {
            apply_to_selected(app, |n| Some(NoteField::Member(n.member.next())));
        }
        (_, KeyCode::Char('i')) => {
            apply_to_selected(app, |n| Some(NoteField::Icon(next_icon(&n.icon))));
        }
        (_, KeyCode::Char('t')) => {
            let applied = apply_to_selected(app, |n| {
                n.goal_timeframe().map(|tf| NoteField::Timeframe(tf.next()))
            });
            if !applied && app.selected.is_some() {
                app.notice("only goals have a timeframe");
            }
        }
        (_, KeyCode::Char('b')) => {
            apply_to_selected(app, |n| Some(NoteField::Kind(toggled_bottleneck(n.kind))));
        }
        (_, KeyCode::Char('c')) => {
            apply_to_selected(app, |n| Some(NoteField::Category(toggled_workshop(n))));
        }
        (_, KeyCode::Char('x')) => {
            apply_to_selected(app, |n| Some(NoteField::Complete(!n.complete)));
        }
        (_, KeyCode::Delete) | (_, KeyCode::Backspace) => request_delete(app),

        // Board
        (_, KeyCode::Char('a')) => {
            arrange(&mut app.board, app.reference);
            app.dirty = true;
            app.reproject();
            app.notice("arranged");
        }
        (_, KeyCode::Char('s')) => app.save(),
        (_, KeyCode::Char('r')) => app.reload(),
        (_, KeyCode::Char('A')) => app.begin_edit(EditTarget::MergePath, ""),

        // Calendar
        (_, KeyCode::Char('<')) | (_, KeyCode::Char(',')) => app.page_month(-1),
        (_, KeyCode::Char('>')) | (_, KeyCode::Char('.')) => app.page_month(1),
        (_, KeyCode::Char('T')) => app.reset_reference(),
        (_, KeyCode::Char('y')) => edit_slot(app, GoalSlot::Year),
        (_, KeyCode::Char('o')) => edit_slot(app, GoalSlot::Month),
        _ => {}
    }
}

fn switch_view(app: &mut App, view: View) {
    if app.view != view {
        app.view = view;
        crate::tui::app::save_ui_state(app);
    }
}

fn zoom(app: &mut App, direction: ZoomDirection) {
    let Some(view) = app.view.spatial() else {
        return;
    };
    let vp = app.viewports.get_mut(view);
    vp.zoom(direction);
    let vp = *vp;
    app.scenes.patch_viewport(view, &vp);
    app.dirty = true;
}

fn pan(app: &mut App, d_cols: i32, d_rows: i32) {
    let Some(view) = app.view.spatial() else {
        return;
    };
    let (dx, dy) = crate::tui::gesture::cells_to_px(d_cols, d_rows);
    let vp = app.viewports.get_mut(view);
    vp.pan(dx, dy);
    let vp = *vp;
    app.scenes.patch_viewport(view, &vp);
    app.dirty = true;
}

fn change_day_width(app: &mut App, delta: i16) {
    let width = app.timeline.day_width.saturating_add_signed(delta);
    app.timeline.day_width = width.clamp(MIN_DAY_WIDTH, MAX_DAY_WIDTH);
    app.reproject();
}

pub(super) fn scroll_timeline(app: &mut App, delta: isize) {
    let max = app.scenes.timeline.bars.len().saturating_sub(1);
    app.timeline_scroll = app.timeline_scroll.saturating_add_signed(delta).min(max);
}

/// Ids selectable in the current view, in display order
fn selectable_ids(app: &App) -> Vec<NoteId> {
    match app.view {
        View::Map | View::Goals => app
            .view
            .spatial()
            .map(|v| app.scenes.spatial(v).cards.iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default(),
        View::Calendar => app
            .board
            .notes
            .iter()
            .filter(|n| !n.is_goal() && n.start.is_some())
            .map(|n| n.id.clone())
            .collect(),
    }
}

fn cycle_selection(app: &mut App, step: isize) {
    let ids = selectable_ids(app);
    if ids.is_empty() {
        return;
    }
    let next = match app.selected.as_ref().and_then(|s| ids.iter().position(|i| i == s)) {
        Some(pos) => (pos as isize + step).rem_euclid(ids.len() as isize) as usize,
        None if step < 0 => ids.len() - 1,
        None => 0,
    };
    app.select(Some(ids[next].clone()));
}

enum Field {
    Title,
    Memo,
    Start,
    End,
}

fn edit_selected(app: &mut App, field: Field) {
    let Some(note) = app.selected.as_ref().and_then(|id| app.board.find(id)) else {
        app.notice("no note selected");
        return;
    };
    let id = note.id.clone();
    let (target, initial) = match field {
        Field::Title => (EditTarget::Title(id), note.title.clone()),
        Field::Memo => (EditTarget::Memo(id), note.memo.clone().unwrap_or_default()),
        Field::Start => (
            EditTarget::Start(id),
            note.start.map(format_date).unwrap_or_default(),
        ),
        Field::End => (
            EditTarget::End(id),
            note.end_or_start().map(format_date).unwrap_or_default(),
        ),
    };
    app.begin_edit(target, &initial);
}

/// Derive one field write from the selected note and apply it
fn apply_to_selected<F>(app: &mut App, f: F) -> bool
where
    F: FnOnce(&crate::model::Note) -> Option<NoteField>,
{
    let Some(note) = app.selected.as_ref().and_then(|id| app.board.find(id)) else {
        app.notice("no note selected");
        return false;
    };
    match f(note) {
        Some(field) => app.update_selected(field),
        None => false,
    }
}

fn request_delete(app: &mut App) {
    let Some(note) = app.selected.as_ref().and_then(|id| app.board.find(id)) else {
        return;
    };
    let message = format!("delete \"{}\"?", note.title);
    let id = note.id.clone();
    app.begin_confirm(message, ConfirmAction::DeleteNote(id));
}

fn edit_slot(app: &mut App, slot: GoalSlot) {
    if app.view != View::Calendar {
        return;
    }
    let initial = crate::ops::note_ops::slot_goal(&app.board.notes, slot)
        .map(|n| n.title.clone())
        .unwrap_or_default();
    app.begin_edit(EditTarget::Slot(slot), &initial);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyEvent;

    fn press(app: &mut App, code: KeyCode) {
        super::super::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn number_keys_switch_views() {
        let mut app = app_with_notes(vec![]);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.view, View::Calendar);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Map);
    }

    #[test]
    fn zoom_keys_clamp() {
        let mut app = app_with_notes(vec![]);
        for _ in 0..100 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.viewports.map.s, crate::model::MAX_SCALE);
        assert_eq!(app.scenes.map.transform.scale, crate::model::MAX_SCALE);
        assert_eq!(app.viewports.vision.s, 1.0);
    }

    #[test]
    fn day_width_is_clamped() {
        let mut app = app_with_notes(vec![]);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char(']'));
        }
        assert_eq!(app.timeline.day_width, MAX_DAY_WIDTH);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('['));
        }
        assert_eq!(app.timeline.day_width, MIN_DAY_WIDTH);
    }

    #[test]
    fn j_selects_first_then_wraps() {
        let mut app = app_with_notes(vec![note("1", "A"), note("2", "B")]);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, Some(NoteId::from("1")));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, Some(NoteId::from("1")));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected, Some(NoteId::from("2")));
    }

    #[test]
    fn x_toggles_completion_of_selection() {
        let mut app = app_with_notes(vec![note("1", "A")]);
        app.select(Some(NoteId::from("1")));
        press(&mut app, KeyCode::Char('x'));
        assert!(app.board.notes[0].complete);
        assert!(app.scenes.map.cards[0].complete);
        assert!(app.dirty);
    }

    #[test]
    fn timeframe_on_task_is_refused() {
        let mut app = app_with_notes(vec![note("1", "A")]);
        app.select(Some(NoteId::from("1")));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.status_message.as_deref(), Some("only goals have a timeframe"));
        assert!(!app.dirty);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app_with_notes(vec![note("1", "A")]);
        app.select(Some(NoteId::from("1")));
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.mode, Mode::Confirm);
        assert_eq!(app.board.notes.len(), 1);
    }

    #[test]
    fn layout_key_arranges_board() {
        let mut app = app_with_notes(vec![note("1", "A")]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!((app.board.notes[0].x, app.board.notes[0].y), (600.0, 50.0));
        assert_eq!(app.scenes.map.cards[0].x, 600.0);
    }

    #[test]
    fn slot_keys_only_in_calendar() {
        let mut app = app_with_notes(vec![]);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Navigate);
        app.view = View::Calendar;
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(
            app.edit.as_ref().unwrap().target,
            EditTarget::Slot(GoalSlot::Month)
        );
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app_with_notes(vec![]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}

use std::path::PathBuf;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::NoteField;
use crate::ops::note_ops::{SlotWrite, write_goal_slot};
use crate::tui::app::{App, EditState, EditTarget, Mode};
use crate::util::date::parse_date;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.edit = None;
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => {
            if let Some(edit) = app.edit.take() {
                app.mode = Mode::Navigate;
                commit_edit(app, edit);
            }
        }
        (_, KeyCode::Backspace) => edit_buffer(app, |e| {
            if let Some(prev) = prev_grapheme_boundary(&e.buffer, e.cursor) {
                e.buffer.replace_range(prev..e.cursor, "");
                e.cursor = prev;
            }
        }),
        (_, KeyCode::Delete) => edit_buffer(app, |e| {
            if let Some(next) = next_grapheme_boundary(&e.buffer, e.cursor) {
                e.buffer.replace_range(e.cursor..next, "");
            }
        }),
        (_, KeyCode::Left) => edit_buffer(app, |e| {
            if let Some(prev) = prev_grapheme_boundary(&e.buffer, e.cursor) {
                e.cursor = prev;
            }
        }),
        (_, KeyCode::Right) => edit_buffer(app, |e| {
            if let Some(next) = next_grapheme_boundary(&e.buffer, e.cursor) {
                e.cursor = next;
            }
        }),
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            edit_buffer(app, |e| e.cursor = 0)
        }
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            edit_buffer(app, |e| e.cursor = e.buffer.len())
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => edit_buffer(app, |e| {
            e.buffer.replace_range(..e.cursor, "");
            e.cursor = 0;
        }),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => edit_buffer(app, |e| {
            e.buffer.insert(e.cursor, c);
            e.cursor += c.len_utf8();
        }),
        _ => {}
    }
}

/// Parse a typed date; blank means the reference date
fn commit_date(app: &mut App, text: &str) -> Option<NaiveDate> {
    let date = parse_date(text, app.reference);
    if date.is_none() {
        app.notice(format!("not a date: {} (expected YYYY-MM-DD)", text));
    }
    date
}

fn edit_buffer<F: FnOnce(&mut EditState)>(app: &mut App, f: F) {
    if let Some(edit) = &mut app.edit {
        f(edit);
    }
}

/// Write a finished edit back through the board
fn commit_edit(app: &mut App, edit: EditState) {
    let text = edit.buffer;
    let (id, field) = match edit.target {
        EditTarget::Title(id) => (id, NoteField::Title(text)),
        EditTarget::Memo(id) => (id, NoteField::Memo(Some(text))),
        EditTarget::Start(id) => {
            let Some(date) = commit_date(app, &text) else {
                return;
            };
            (id, NoteField::Start(Some(date)))
        }
        EditTarget::End(id) => {
            let Some(date) = commit_date(app, &text) else {
                return;
            };
            (id, NoteField::End(Some(date)))
        }
        EditTarget::Slot(slot) => {
            match write_goal_slot(&mut app.board, slot, &text, app.reference) {
                SlotWrite::Ignored => return,
                SlotWrite::Created(id) => app.notice(format!("created goal {}", id)),
                SlotWrite::Updated(_) => {}
            }
            app.dirty = true;
            app.reproject();
            return;
        }
        EditTarget::MergePath => {
            let path = PathBuf::from(text.trim());
            if !text.trim().is_empty() {
                app.merge_from(&path);
            }
            return;
        }
    };
    if !app.board.update_note(&id, field) {
        log::debug!("edit for {} dropped: note is gone", id);
        return;
    }
    app.dirty = true;
    app.reproject();
}

use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let state = app.confirm.take();
            app.mode = Mode::Navigate;
            if let Some(state) = state {
                run_confirmed(app, state.action);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn run_confirmed(app: &mut App, action: ConfirmAction) {
    match action {
        ConfirmAction::DeleteNote(id) => {
            let removed = app.board.remove_note(&id);
            if removed > 0 {
                log::info!("deleted note {}", id);
                if app.selected.as_ref() == Some(&id) {
                    app.selected = None;
                }
                app.dirty = true;
                app.reproject();
                app.notice("deleted");
            }
        }
        ConfirmAction::AcknowledgeEvent { title } => {
            log::info!("event acknowledged: {}", title);
            app.notice(format!("noted: {}", title));
        }
    }
}

mod confirm;
mod edit;
mod mouse;
mod navigate;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};

use super::app::{App, Mode};

use confirm::*;
use edit::*;
use navigate::*;

pub use mouse::{handle_pointer, pointer_event};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Handle a mouse event from the terminal
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    if let Some(ev) = pointer_event(mouse) {
        handle_pointer(app, ev, now);
    }
}

/// Bracketed paste: only meaningful while editing; newlines become spaces
pub fn handle_paste(app: &mut App, text: &str) {
    if app.mode != Mode::Edit || text.is_empty() {
        return;
    }
    let clean = text.replace('\n', " ").replace('\r', "");
    if let Some(edit) = &mut app.edit {
        edit.buffer.insert_str(edit.cursor, &clean);
        edit.cursor += clean.len();
    }
}

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::snapshot_io::DEFAULT_BOARD_FILE;
use crate::io::workspace::Workspace;
use crate::model::{Board, BoardConfig, Note, NoteId, Viewports};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app, which also records its layout areas.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// The wall-clock date every test app pretends it is
pub fn test_today() -> NaiveDate {
    date("2026-01-10")
}

pub fn note(id: &str, title: &str) -> Note {
    Note::new(NoteId::from(id), title)
}

/// A workspace rooted in `dir` with default config
pub fn workspace_in(dir: &Path) -> Workspace {
    Workspace {
        board_path: dir.join(DEFAULT_BOARD_FILE),
        dir: dir.to_path_buf(),
        config: BoardConfig::default(),
    }
}

/// An app over the given notes whose files point at a directory that is
/// never created; saves fail quietly.
pub fn app_with_notes(notes: Vec<Note>) -> App {
    let dir = PathBuf::from("/nonexistent/planboard-test");
    App::new(
        workspace_in(&dir),
        Board::new(notes, vec![]),
        Viewports::default(),
        vec![],
        test_today(),
    )
}

/// An app whose board and state files live in `dir`
pub fn app_in_dir(dir: &Path, notes: Vec<Note>) -> App {
    App::new(
        workspace_in(dir),
        Board::new(notes, vec![]),
        Viewports::default(),
        vec![],
        test_today(),
    )
}

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::model::{Board, Link, Note, Snapshot, Viewport};

pub const DEFAULT_BOARD_FILE: &str = "planboard.json";

/// Error type for snapshot load/save
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid board format: missing notes array")]
    MissingNotes,
    #[error("invalid note: {0}")]
    InvalidNote(serde_json::Error),
    #[error("invalid link: {0}")]
    InvalidLink(serde_json::Error),
}

/// Directory holding a board file (and its config, state and logs)
pub fn board_dir(board_path: &Path) -> PathBuf {
    match board_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parse and validate snapshot text. Nothing is applied anywhere; callers
/// replace or merge only after this succeeds.
///
/// `notes` must be an array. `links` falls back to empty when absent or not
/// an array, and viewports fall back to identity.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, SnapshotError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = value.as_object().ok_or(SnapshotError::MissingNotes)?;

    let notes_value = obj
        .get("notes")
        .filter(|v| v.is_array())
        .ok_or(SnapshotError::MissingNotes)?;
    let notes: Vec<Note> =
        serde_json::from_value(notes_value.clone()).map_err(SnapshotError::InvalidNote)?;

    let links: Vec<Link> = match obj.get("links") {
        Some(v) if v.is_array() => {
            serde_json::from_value(v.clone()).map_err(SnapshotError::InvalidLink)?
        }
        _ => Vec::new(),
    };

    let viewport = |key: &str| -> Viewport {
        obj.get(key)
            .and_then(|v| serde_json::from_value::<Viewport>(v.clone()).ok())
            .unwrap_or_default()
            .sanitized()
    };

    Ok(Snapshot {
        notes,
        links,
        map_pos: viewport("mapPos"),
        vis_pos: viewport("visPos"),
    })
}

/// Read and validate a board file
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|e| SnapshotError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let snapshot = parse_snapshot(&text)?;
    log::info!(
        "loaded {} notes, {} links from {}",
        snapshot.notes.len(),
        snapshot.links.len(),
        path.display()
    );
    Ok(snapshot)
}

/// Load a board file, or start empty when it does not exist yet
pub fn load_or_empty(path: &Path) -> Result<Snapshot, SnapshotError> {
    if path.exists() {
        load_snapshot(path)
    } else {
        log::info!("{} does not exist; starting an empty board", path.display());
        Ok(Snapshot::default())
    }
}

/// Write a snapshot as pretty JSON, atomically
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let content = serde_json::to_string_pretty(snapshot)?;
    atomic_write(path, content.as_bytes()).map_err(|e| SnapshotError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!(
        "saved {} notes, {} links to {}",
        snapshot.notes.len(),
        snapshot.links.len(),
        path.display()
    );
    Ok(())
}

/// Merge a board file into `board`. The board is untouched on any error.
/// Returns the number of notes added.
pub fn merge_file(board: &mut Board, path: &Path) -> Result<usize, SnapshotError> {
    let incoming = load_snapshot(path)?;
    let added = board.merge(incoming);
    log::info!("merged {} new notes from {}", added, path.display());
    Ok(added)
}

/// Write via a temp file in the same directory, then rename over the target
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = board_dir(path);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

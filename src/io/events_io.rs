use std::fs;
use std::path::{Path, PathBuf};

use crate::model::ExternalEvent;

/// Error type for the external event feed
#[derive(Debug, thiserror::Error)]
pub enum EventFeedError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid event feed: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Read an event feed: a JSON array of events
pub fn read_events(path: &Path) -> Result<Vec<ExternalEvent>, EventFeedError> {
    let text = fs::read_to_string(path).map_err(|e| EventFeedError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let events: Vec<ExternalEvent> = serde_json::from_str(&text)?;
    let undated = events.iter().filter(|e| e.date().is_none()).count();
    if undated > 0 {
        log::warn!("{} events in {} have no usable date", undated, path.display());
    }
    Ok(events)
}

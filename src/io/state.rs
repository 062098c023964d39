use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::date::{format_date, parse_date};

pub const STATE_FILE: &str = ".planboard-state.json";

/// Persisted TUI state (written beside the board file)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Which view is showing ("map", "goals", "cal")
    #[serde(default)]
    pub view: String,
    /// Navigated reference date; absent means "follow the real today"
    #[serde(default)]
    pub reference_date: Option<String>,
}

impl UiState {
    pub fn reference(&self) -> Option<NaiveDate> {
        let raw = self.reference_date.as_deref()?;
        if raw.trim().is_empty() {
            return None;
        }
        parse_date(raw, NaiveDate::MIN)
    }

    pub fn set_reference(&mut self, date: Option<NaiveDate>) {
        self.reference_date = date.map(format_date);
    }
}

/// Read the state file from the board directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file to the board directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join(STATE_FILE);
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            view: "cal".into(),
            ..Default::default()
        };
        state.set_reference(NaiveDate::from_ymd_opt(2026, 3, 1));

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert_eq!(loaded.view, "cal");
        assert_eq!(loaded.reference_date.as_deref(), Some("2026-03-01"));
        assert_eq!(loaded.reference(), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STATE_FILE), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.view, "");
        assert!(state.reference().is_none());
    }

    #[test]
    fn garbage_reference_is_ignored() {
        let state = UiState {
            view: String::new(),
            reference_date: Some("someday".into()),
        };
        assert!(state.reference().is_none());
    }
}

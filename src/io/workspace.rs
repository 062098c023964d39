use std::path::{Path, PathBuf};

use crate::model::{Board, BoardConfig, ExternalEvent, Viewports};

use super::config_io::{ConfigError, read_config, resolve};
use super::events_io::{EventFeedError, read_events};
use super::snapshot_io::{DEFAULT_BOARD_FILE, SnapshotError, board_dir, load_or_empty, save_snapshot};

/// A board file together with the settings that live beside it
#[derive(Debug, Clone)]
pub struct Workspace {
    pub board_path: PathBuf,
    pub dir: PathBuf,
    pub config: BoardConfig,
}

/// Resolve the board file (default `planboard.json` in the working
/// directory) and read its config.
pub fn open_workspace(board: Option<&Path>) -> Result<Workspace, ConfigError> {
    let board_path = board
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BOARD_FILE));
    let dir = board_dir(&board_path);
    let config = read_config(&dir)?;
    Ok(Workspace {
        board_path,
        dir,
        config,
    })
}

impl Workspace {
    /// Load the board and both viewports. A missing file is an empty board.
    pub fn load_board(&self) -> Result<(Board, Viewports), SnapshotError> {
        let snapshot = load_or_empty(&self.board_path)?;
        let viewports = Viewports {
            map: snapshot.map_pos,
            vision: snapshot.vis_pos,
        };
        Ok((Board::new(snapshot.notes, snapshot.links), viewports))
    }

    pub fn save_board(&self, board: &Board, viewports: &Viewports) -> Result<(), SnapshotError> {
        save_snapshot(
            &self.board_path,
            &board.to_snapshot(viewports.map, viewports.vision),
        )
    }

    /// Event feed path: the explicit override, else `[events] file`
    pub fn events_path(&self, override_path: Option<&Path>) -> Option<PathBuf> {
        match override_path {
            Some(p) => Some(p.to_path_buf()),
            None => self
                .config
                .events
                .file
                .as_deref()
                .map(|f| resolve(&self.dir, f)),
        }
    }

    /// Read the event feed, or nothing when none is configured
    pub fn load_events(&self, override_path: Option<&Path>) -> Result<Vec<ExternalEvent>, EventFeedError> {
        match self.events_path(override_path) {
            Some(path) => read_events(&path),
            None => Ok(Vec::new()),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        let configured = self
            .config
            .log
            .dir
            .as_deref()
            .unwrap_or(crate::logging::DEFAULT_LOG_DIR);
        let dir = resolve(&self.dir, configured);
        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Start file logging as configured
    pub fn start_logging(&self) -> Result<(), String> {
        crate::logging::init_logging(&self.config.log.level, &self.log_dir())
    }
}

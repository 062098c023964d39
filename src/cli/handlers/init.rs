use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::InitArgs;
use crate::io::config_io::CONFIG_FILE;
use crate::io::snapshot_io::{DEFAULT_BOARD_FILE, board_dir, save_snapshot};
use crate::model::Snapshot;

const CONFIG_TEMPLATE: &str = r##"# planboard settings. Every key is optional.

[timeline]
# day_width = 4          # cells per day column (3-12)
# lead_days = 7          # days shown before the reference date
# label_width = 20       # row label gutter
# show_goals = false     # goals and bottlenecks get timeline rows

[ui]
# split_percent = 60     # map canvas share of the map view
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# highlight = "#FB4196"
# event_high = "#2ECC71"
# event_low = "#F39C12"
#
# [ui.member_colors]
# p = "#4488FF"
# m = "#FF66AA"
# a = "#44DD88"
# b = "#FF9933"

[log]
# level = "info"         # off, error, warn, info, debug, trace
# dir = ".planboard-logs"

[events]
# file = "events.json"   # external event feed shown on the calendar
"##;

/// Write an empty board, and a commented config when none exists yet
pub fn cmd_init(args: InitArgs, board: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let board_path = board
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BOARD_FILE));

    if board_path.exists() && !args.force {
        return Err(format!(
            "board already exists: {} (use --force to overwrite)",
            board_path.display()
        )
        .into());
    }

    let dir = board_dir(&board_path);
    fs::create_dir_all(&dir)?;
    save_snapshot(&board_path, &Snapshot::default())?;
    println!("created {}", board_path.display());

    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
        println!("created {}", config_path.display());
    }
    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pb", about = concat!("planboard v", env!("CARGO_PKG_VERSION"), " - map, timeline and calendar for one family plan"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board file (default: planboard.json in the current directory)
    #[arg(short = 'f', long = "board", global = true)]
    pub board: Option<PathBuf>,

    /// External event feed (overrides [events] file in planboard.toml)
    #[arg(long, global = true)]
    pub events: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty board and a commented planboard.toml
    Init(InitArgs),
    /// List notes
    List(ListArgs),
    /// Add a note
    Add(AddArgs),
    /// Link two notes
    Link(LinkArgs),
    /// Delete a note and every link touching it
    Rm(RmArgs),
    /// Toggle a note's completion
    Done(DoneArgs),
    /// Auto-arrange notes into zones and save
    Layout(LayoutArgs),
    /// Merge another board file into this one
    Merge(MergeArgs),
    /// Print the timeline around a date
    Timeline(TimelineArgs),
    /// Print the five-week calendar around a date
    Cal(CalArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing board file
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only goals
    #[arg(long)]
    pub goals: bool,
    /// Only notes for this member (p, m, a, b)
    #[arg(long)]
    pub member: Option<String>,
    /// Only notes active on this date (YYYY-MM-DD)
    #[arg(long)]
    pub on: Option<String>,
    /// Hide completed notes
    #[arg(long)]
    pub open: bool,
}

#[derive(Args)]
pub struct TimelineArgs {
    /// Reference date (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Include goals and bottlenecks
    #[arg(long)]
    pub goals: bool,
}

#[derive(Args)]
pub struct CalArgs {
    /// Any date in the month to show (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Note title
    pub title: String,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Family member (p, m, a, b)
    #[arg(long)]
    pub member: Option<String>,
    /// Make it a goal with this timeframe (year, month, week)
    #[arg(long)]
    pub goal: Option<String>,
    /// Mark as a bottleneck
    #[arg(long)]
    pub bottleneck: bool,
    /// Place in the workshop zone
    #[arg(long)]
    pub workshop: bool,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub memo: Option<String>,
    /// Map position (model pixels)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Source note id
    pub from: String,
    /// Target note id
    pub to: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Note id
    pub id: String,
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Note id
    pub id: String,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Reference date for zone placement (default: today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Board file to merge in
    pub file: PathBuf,
}

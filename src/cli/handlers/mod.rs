mod init;
pub use init::cmd_init;

use std::path::Path;

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::snapshot_io::merge_file;
use crate::io::state::read_ui_state;
use crate::io::workspace::{Workspace, open_workspace};
use crate::model::{
    Board, Member, NoteField, NoteId, NoteKind, SpatialView, Timeframe, Viewports, WORKSHOP_CATEGORY,
};
use crate::ops::layout::arrange;
use crate::ops::note_ops::{self, NoteError};
use crate::projection::{TimelineOptions, project_calendar, project_timeline};
use crate::util::date::{parse_date, today};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let board = cli.board.as_deref();

    match cli.command {
        None => Err("no subcommand given (run `pb` without arguments for the board)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, board),

            // Read commands
            Commands::List(args) => cmd_list(args, board, json),
            Commands::Timeline(args) => cmd_timeline(args, board, json),
            Commands::Cal(args) => cmd_cal(args, board, cli.events.as_deref(), json),

            // Write commands
            Commands::Add(args) => cmd_add(args, board, json),
            Commands::Link(args) => cmd_link(args, board),
            Commands::Rm(args) => cmd_rm(args, board),
            Commands::Done(args) => cmd_done(args, board, json),

            // Whole-board maintenance
            Commands::Layout(args) => cmd_layout(args, board, json),
            Commands::Merge(args) => cmd_merge(args, board, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Loaded {
    workspace: Workspace,
    board: Board,
    viewports: Viewports,
}

fn open(board: Option<&Path>) -> Result<Loaded, Box<dyn std::error::Error>> {
    let workspace = open_workspace(board)?;
    if let Err(e) = workspace.start_logging() {
        eprintln!("warning: file logging disabled: {}", e);
    }
    let (board, viewports) = workspace.load_board()?;
    Ok(Loaded {
        workspace,
        board,
        viewports,
    })
}

fn save(loaded: &Loaded) -> CmdResult {
    loaded.workspace.save_board(&loaded.board, &loaded.viewports)?;
    Ok(())
}

fn date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw, today()).ok_or_else(|| format!("invalid date: {}", raw))
}

fn opt_date_arg(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    raw.map(date_arg).transpose()
}

fn member_arg(raw: &str) -> Result<Member, String> {
    Member::from_code(raw.trim()).ok_or_else(|| format!("unknown member: {} (use p, m, a or b)", raw))
}

fn timeframe_arg(raw: &str) -> Result<Timeframe, String> {
    Timeframe::parse(raw.trim()).ok_or_else(|| format!("unknown timeframe: {} (use year, month or week)", raw))
}

fn existing_id(board: &Board, raw: &str) -> Result<NoteId, NoteError> {
    let id = NoteId::from(raw);
    if board.contains(&id) {
        Ok(id)
    } else {
        Err(NoteError::NotFound(raw.to_string()))
    }
}

/// Reference date for read commands: the flag, else the date the board was
/// last navigated to, else today
fn reference_for(raw: Option<&str>, workspace: &Workspace) -> Result<NaiveDate, String> {
    if let Some(raw) = raw {
        return date_arg(raw);
    }
    Ok(read_ui_state(&workspace.dir)
        .and_then(|state| state.reference())
        .unwrap_or_else(today))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let loaded = open(board)?;
    let member = args.member.as_deref().map(member_arg).transpose()?;
    let on = opt_date_arg(args.on.as_deref())?;

    let notes: Vec<_> = loaded
        .board
        .notes
        .iter()
        .filter(|n| !args.goals || n.is_goal())
        .filter(|n| member.is_none_or(|m| n.member == m))
        .filter(|n| on.is_none_or(|day| n.active_on(day)))
        .filter(|n| !args.open || !n.complete)
        .collect();

    if json {
        let shown: Vec<&NoteId> = notes.iter().map(|n| &n.id).collect();
        let links = loaded
            .board
            .links
            .iter()
            .filter(|l| shown.contains(&&l.from) && shown.contains(&&l.to))
            .map(|l| LinkJson {
                from: l.from.to_string(),
                to: l.to.to_string(),
            })
            .collect();
        return print_json(&BoardJson {
            notes: notes.iter().map(|n| note_to_json(n)).collect(),
            links,
        });
    }

    if notes.is_empty() {
        println!("no notes");
    }
    for note in notes {
        println!("{}", format_note_line(note));
    }
    Ok(())
}

fn cmd_timeline(args: TimelineArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let loaded = open(board)?;
    let reference = reference_for(args.date.as_deref(), &loaded.workspace)?;
    let mut options = TimelineOptions::from_config(&loaded.workspace.config.timeline);
    if args.goals {
        options.show_goals = true;
    }
    let scene = project_timeline(&loaded.board.notes, reference, options, None);

    if json {
        return print_json(&timeline_to_json(&scene));
    }
    for line in format_timeline(&scene) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_cal(args: CalArgs, board: Option<&Path>, events: Option<&Path>, json: bool) -> CmdResult {
    let loaded = open(board)?;
    let reference = reference_for(args.date.as_deref(), &loaded.workspace)?;
    let events = loaded.workspace.load_events(events)?;
    let scene = project_calendar(&loaded.board.notes, &events, reference, today());

    if json {
        return print_json(&calendar_to_json(&scene));
    }
    for line in format_calendar(&scene) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let mut loaded = open(board)?;

    let title = args.title.trim();
    if title.is_empty() {
        return Err("title must not be empty".into());
    }
    let start = opt_date_arg(args.start.as_deref())?;
    let end = opt_date_arg(args.end.as_deref())?;
    if let Some(e) = end
        && e < start.unwrap_or_else(today)
    {
        return Err(format!("end {} is before start", e).into());
    }
    let member = args.member.as_deref().map(member_arg).transpose()?;
    let timeframe = args.goal.as_deref().map(timeframe_arg).transpose()?;

    let view = if timeframe.is_some() {
        SpatialView::Vision
    } else {
        SpatialView::Map
    };
    let board = &mut loaded.board;
    let id = note_ops::create_note(board, view, args.x, args.y, today());

    board.update_note(&id, NoteField::Title(title.to_string()));
    if let Some(start) = start {
        board.update_note(&id, NoteField::Start(Some(start)));
        board.update_note(&id, NoteField::End(Some(end.unwrap_or(start))));
    } else if let Some(end) = end {
        board.update_note(&id, NoteField::End(Some(end)));
    }
    if let Some(tf) = timeframe {
        board.update_note(&id, NoteField::Timeframe(tf));
    }
    if args.bottleneck {
        let kind = board.find(&id).map_or(NoteKind::Task, |n| n.kind);
        board.update_note(&id, NoteField::Kind(note_ops::toggled_bottleneck(kind)));
    }
    if args.workshop {
        board.update_note(&id, NoteField::Category(Some(WORKSHOP_CATEGORY.to_string())));
    }
    if let Some(member) = member {
        board.update_note(&id, NoteField::Member(member));
    }
    if let Some(icon) = args.icon {
        board.update_note(&id, NoteField::Icon(icon));
    }
    if let Some(memo) = args.memo {
        board.update_note(&id, NoteField::Memo(Some(memo)));
    }

    save(&loaded)?;
    log::info!("cli: added note {}", id);

    if json
        && let Some(note) = loaded.board.find(&id)
    {
        return print_json(&note_to_json(note));
    }
    println!("added {}", id);
    Ok(())
}

fn cmd_link(args: LinkArgs, board: Option<&Path>) -> CmdResult {
    let mut loaded = open(board)?;
    let from = NoteId::from(args.from.as_str());
    let to = NoteId::from(args.to.as_str());
    if loaded.board.has_link(&from, &to) {
        println!("already linked: {} -> {}", from, to);
        return Ok(());
    }
    note_ops::add_link(&mut loaded.board, &from, &to)?;
    save(&loaded)?;
    println!("linked {} -> {}", from, to);
    Ok(())
}

fn cmd_rm(args: RmArgs, board: Option<&Path>) -> CmdResult {
    let mut loaded = open(board)?;
    let id = existing_id(&loaded.board, &args.id)?;
    if !args.yes {
        return Err(format!("refusing to delete {} without --yes", id).into());
    }
    let links_before = loaded.board.links.len();
    loaded.board.remove_note(&id);
    let links_removed = links_before - loaded.board.links.len();
    save(&loaded)?;
    println!("deleted {} ({} links removed)", id, links_removed);
    Ok(())
}

fn cmd_done(args: DoneArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let mut loaded = open(board)?;
    let id = existing_id(&loaded.board, &args.id)?;
    let complete = note_ops::toggle_complete(&mut loaded.board, &id)
        .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
    save(&loaded)?;

    if json
        && let Some(note) = loaded.board.find(&id)
    {
        return print_json(&note_to_json(note));
    }
    if complete {
        println!("{} complete", id);
    } else {
        println!("{} reopened", id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Whole-board maintenance
// ---------------------------------------------------------------------------

fn cmd_layout(args: LayoutArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let mut loaded = open(board)?;
    let reference = match args.date.as_deref() {
        Some(raw) => date_arg(raw)?,
        None => today(),
    };
    arrange(&mut loaded.board, reference);
    save(&loaded)?;

    let count = loaded.board.notes.len();
    if json {
        return print_json(&CountJson { count });
    }
    println!("arranged {} notes", count);
    Ok(())
}

fn cmd_merge(args: MergeArgs, board: Option<&Path>, json: bool) -> CmdResult {
    let mut loaded = open(board)?;
    let added = merge_file(&mut loaded.board, &args.file)?;
    save(&loaded)?;

    if json {
        return print_json(&CountJson { count: added });
    }
    println!("merged {} new notes", added);
    Ok(())
}

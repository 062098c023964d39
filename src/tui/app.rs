use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::workspace::{Workspace, open_workspace};
use crate::model::{Board, ExternalEvent, NoteField, NoteId, SpatialView, Viewports};
use crate::ops::note_ops::GoalSlot;
use crate::projection::{ProjectionInput, Scenes, TimelineOptions};
use crate::util::date::{add_months, today};

use super::gesture::Gesture;
use super::input;
use super::render;
use super::theme::Theme;

/// Two presses on the same cell within this window count as a double-click
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Map canvas over the timeline
    Map,
    /// Vision board of goals
    Goals,
    Calendar,
}

impl View {
    pub const ALL: [View; 3] = [View::Map, View::Goals, View::Calendar];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Map => "map",
            View::Goals => "goals",
            View::Calendar => "cal",
        }
    }

    pub fn parse(s: &str) -> Option<View> {
        View::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Map => "Map",
            View::Goals => "Goals",
            View::Calendar => "Calendar",
        }
    }

    pub fn next(self) -> View {
        match self {
            View::Map => View::Goals,
            View::Goals => View::Calendar,
            View::Calendar => View::Map,
        }
    }

    /// The spatial canvas this view shows, if any
    pub fn spatial(self) -> Option<SpatialView> {
        match self {
            View::Map => Some(SpatialView::Map),
            View::Goals => Some(SpatialView::Vision),
            View::Calendar => None,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Confirm,
}

/// What an in-progress text edit writes to on Enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Title(NoteId),
    Memo(NoteId),
    Start(NoteId),
    End(NoteId),
    Slot(GoalSlot),
    MergePath,
}

impl EditTarget {
    pub fn prompt(&self) -> &'static str {
        match self {
            EditTarget::Title(_) => "title",
            EditTarget::Memo(_) => "memo",
            EditTarget::Start(_) => "start",
            EditTarget::End(_) => "end",
            EditTarget::Slot(GoalSlot::Year) => "year goal",
            EditTarget::Slot(GoalSlot::Month) => "month goal",
            EditTarget::Slot(GoalSlot::Week(_)) => "week goal",
            EditTarget::MergePath => "merge file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub target: EditTarget,
    pub buffer: String,
    /// Byte offset into `buffer`
    pub cursor: usize,
}

impl EditState {
    pub fn new(target: EditTarget, initial: &str) -> Self {
        EditState {
            target,
            buffer: initial.to_string(),
            cursor: initial.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteNote(NoteId),
    /// Informational prompt for an external event; never mutates the board
    AcknowledgeEvent { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Where each region landed in the last frame, for pointer hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutAreas {
    pub content: Rect,
    pub canvas: Option<Rect>,
    pub splitter: Option<Rect>,
    pub timeline: Option<Rect>,
    pub calendar: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastClick {
    pub col: u16,
    pub row: u16,
    pub at: Instant,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub board: Board,
    pub viewports: Viewports,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub selected: Option<NoteId>,
    /// Navigable "today" used by the timeline and calendar
    pub reference: NaiveDate,
    /// Whether `reference` was navigated away from the wall clock
    pub reference_pinned: bool,
    pub real_today: NaiveDate,
    pub timeline: TimelineOptions,
    /// First visible timeline row
    pub timeline_scroll: usize,
    /// Share of the map view given to the canvas
    pub split_percent: u16,
    pub gesture: Gesture,
    pub confirm: Option<ConfirmState>,
    pub edit: Option<EditState>,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub areas: LayoutAreas,
    pub scenes: Scenes,
    pub events: Vec<ExternalEvent>,
    pub last_click: Option<LastClick>,
    /// Unsaved board changes
    pub dirty: bool,
}

impl App {
    pub fn new(
        workspace: Workspace,
        board: Board,
        viewports: Viewports,
        events: Vec<ExternalEvent>,
        real_today: NaiveDate,
    ) -> Self {
        let theme = Theme::from_config(&workspace.config.ui);
        let timeline = TimelineOptions::from_config(&workspace.config.timeline);
        let split_percent = workspace.config.ui.split_percent.clamp(
            super::gesture::MIN_SPLIT_PERCENT,
            super::gesture::MAX_SPLIT_PERCENT,
        );
        let scenes = Scenes::project(&ProjectionInput {
            board: &board,
            viewports: &viewports,
            selected: None,
            reference: real_today,
            real_today,
            timeline,
            events: &events,
        });

        App {
            workspace,
            board,
            viewports,
            view: View::Map,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            selected: None,
            reference: real_today,
            reference_pinned: false,
            real_today,
            timeline,
            timeline_scroll: 0,
            split_percent,
            gesture: Gesture::Idle,
            confirm: None,
            edit: None,
            status_message: None,
            show_help: false,
            areas: LayoutAreas::default(),
            scenes,
            events,
            last_click: None,
            dirty: false,
        }
    }

    /// Rebuild every scene from the board
    pub fn reproject(&mut self) {
        self.scenes.reproject(&ProjectionInput {
            board: &self.board,
            viewports: &self.viewports,
            selected: self.selected.as_ref(),
            reference: self.reference,
            real_today: self.real_today,
            timeline: self.timeline,
            events: &self.events,
        });
    }

    pub fn select(&mut self, id: Option<NoteId>) {
        if self.selected != id {
            self.selected = id;
            self.reproject();
        }
    }

    /// Write one field of the selected note and refresh
    pub fn update_selected(&mut self, field: NoteField) -> bool {
        let Some(id) = self.selected.clone() else {
            self.status_message = Some("no note selected".into());
            return false;
        };
        let applied = self.board.update_note(&id, field);
        if applied {
            self.dirty = true;
            self.reproject();
        }
        applied
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn begin_edit(&mut self, target: EditTarget, initial: &str) {
        self.edit = Some(EditState::new(target, initial));
        self.mode = Mode::Edit;
    }

    pub fn begin_confirm(&mut self, message: String, action: ConfirmAction) {
        self.confirm = Some(ConfirmState { message, action });
        self.mode = Mode::Confirm;
    }

    // ----- reference date -----

    pub fn set_reference(&mut self, date: NaiveDate, pinned: bool) {
        self.reference = date;
        self.reference_pinned = pinned;
        self.reproject();
        save_ui_state(self);
    }

    /// Page the calendar by whole months; the navigated date is persisted
    pub fn page_month(&mut self, delta: i32) {
        let date = add_months(self.reference, delta);
        self.set_reference(date, true);
    }

    /// Back to the wall clock; forgets any persisted date
    pub fn reset_reference(&mut self) {
        self.set_reference(self.real_today, false);
    }

    // ----- persistence -----

    pub fn save(&mut self) {
        match self.workspace.save_board(&self.board, &self.viewports) {
            Ok(()) => {
                self.dirty = false;
                self.notice(format!("saved {}", self.workspace.board_path.display()));
            }
            Err(e) => {
                log::error!("save failed: {}", e);
                self.notice(format!("save failed: {}", e));
            }
        }
    }

    /// Replace the board from disk. On any error the current board stays.
    pub fn reload(&mut self) {
        match self.workspace.load_board() {
            Ok((board, viewports)) => {
                self.board = board;
                self.viewports = viewports;
                self.gesture = Gesture::Idle;
                if self
                    .selected
                    .as_ref()
                    .is_some_and(|id| !self.board.contains(id))
                {
                    self.selected = None;
                }
                self.dirty = false;
                self.reproject();
                self.notice(format!("loaded {} notes", self.board.notes.len()));
            }
            Err(e) => {
                log::warn!("reload rejected: {}", e);
                self.notice(format!("load failed: {}", e));
            }
        }
    }

    pub fn merge_from(&mut self, path: &Path) {
        match crate::io::snapshot_io::merge_file(&mut self.board, path) {
            Ok(added) => {
                if added > 0 {
                    self.dirty = true;
                }
                self.reproject();
                self.notice(format!("merged {} new notes", added));
            }
            Err(e) => {
                log::warn!("merge rejected: {}", e);
                self.notice(format!("merge failed: {}", e));
            }
        }
    }
}

/// Restore the view and navigated date from the state file
pub fn restore_ui_state(app: &mut App) {
    let Some(state) = read_ui_state(&app.workspace.dir) else {
        return;
    };
    if let Some(view) = View::parse(&state.view) {
        app.view = view;
    }
    if let Some(date) = state.reference() {
        app.reference = date;
        app.reference_pinned = true;
    }
    app.reproject();
}

/// Save the view and navigated date to the state file
pub fn save_ui_state(app: &App) {
    let mut state = UiState {
        view: app.view.as_str().to_string(),
        reference_date: None,
    };
    if app.reference_pinned {
        state.set_reference(Some(app.reference));
    }
    if let Err(e) = write_ui_state(&app.workspace.dir, &state) {
        log::warn!("could not write ui state: {}", e);
    }
}

/// Run the TUI application
pub fn run(board: Option<&Path>, events: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = open_workspace(board)?;
    if let Err(e) = workspace.start_logging() {
        eprintln!("warning: logging disabled: {}", e);
    }
    let (board, viewports) = workspace.load_board()?;
    let feed = workspace.load_events(events)?;

    let mut app = App::new(workspace, board, viewports, feed, today());
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);
    if app.dirty {
        app.save();
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

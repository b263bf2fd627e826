use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_config_or_default;
use crate::io::oplog::{LogCategory, LogEntry, log_event};
use crate::io::session::{Committed, Session};
use crate::io::watcher::{FileEvent, WorkspaceWatcher};
use crate::io::workspace::discover_workspace;
use crate::model::config::Config;
use crate::model::list::ItemRef;
use crate::ops::filter::{Filter, visible_indices};
use crate::ops::input::{InputAction, interpret_input};
use crate::ops::nav::NavState;
use crate::ops::todo_ops::EditOutcome;
use crate::tui::input;
use crate::tui::render;
use crate::tui::theme::Theme;

/// How long a status message stays visible
pub const MESSAGE_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    pub shown_at: Instant,
}

/// What the input line will do on Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Add,
    Edit,
    Filter,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Prompt::Add => "Add",
            Prompt::Edit => "Edit",
            Prompt::Filter => "Filter",
        }
    }
}

/// Main application state
pub struct App {
    pub session: Session,
    /// Workspace directory, for config reloads. None in tests.
    pub dir: Option<PathBuf>,
    pub config: Config,
    pub theme: Theme,
    pub nav: NavState,
    /// Input line contents and cursor (byte offset)
    pub input: String,
    pub cursor: usize,
    /// Todo being edited in the input line
    pub editing: Option<ItemRef>,
    pub filter: Option<Filter>,
    pub message: Option<StatusMessage>,
    pub should_quit: bool,
    /// Reference clock for relative dates
    pub clock: fn() -> DateTime<Utc>,
}

impl App {
    pub fn new(session: Session, config: Config, dir: Option<PathBuf>) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            session,
            dir,
            config,
            theme,
            nav: NavState::NoSelection,
            input: String::new(),
            cursor: 0,
            editing: None,
            filter: None,
            message: None,
            should_quit: false,
            clock: Utc::now,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// List indices currently shown, in order
    pub fn visible(&self) -> Vec<usize> {
        visible_indices(self.session.list().records(), self.filter.as_ref())
    }

    pub fn prompt(&self) -> Prompt {
        if self.editing.is_some() {
            Prompt::Edit
        } else if self.input.starts_with(self.config.keys.filter()) {
            Prompt::Filter
        } else {
            Prompt::Add
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.message = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// Drop the status message once it has been shown long enough
    pub fn expire_message(&mut self, now: Instant) {
        if let Some(ref msg) = self.message
            && now.duration_since(msg.shown_at) >= MESSAGE_TTL
        {
            self.message = None;
        }
    }

    /// Show how the save after a mutation went
    fn report<T>(&mut self, committed: &Committed<T>, success: &str) {
        match committed.saved {
            Ok(()) => self.set_message(success, MessageKind::Success),
            Err(ref e) => self.set_message(format!("Save failed: {}", e), MessageKind::Error),
        }
    }

    // -----------------------------------------------------------------------
    // Input line
    // -----------------------------------------------------------------------

    /// Recompute the live filter after the input changed. An empty input
    /// drops the filter and any pending edit; a pending edit never filters.
    pub fn input_changed(&mut self) {
        if self.input.is_empty() {
            self.filter = None;
            self.editing = None;
            return;
        }
        if self.editing.is_none()
            && let Some(expr) = self.input.strip_prefix(self.config.keys.filter())
        {
            self.filter = Some(Filter::parse(expr, self.now()));
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.len();
        self.input_changed();
    }

    /// Esc with focus on the input line
    pub fn cancel_input(&mut self) {
        self.editing = None;
        self.set_input("");
    }

    /// Enter with focus on the input line
    pub fn submit(&mut self) {
        let now = self.now();
        match interpret_input(&self.input, self.editing, self.config.keys.filter()) {
            InputAction::Clear => self.cancel_input(),
            InputAction::Filter(expr) => {
                self.filter = Some(Filter::parse(&expr, now));
            }
            InputAction::Add(text) => {
                let committed = self.session.add(&text, now);
                self.report(&committed, "Added");
                self.cancel_input();
            }
            InputAction::Update(target, text) => {
                let committed = self.session.edit(target, &text, now);
                let msg = match committed.value {
                    EditOutcome::Updated(_) => "Updated",
                    EditOutcome::Added(_) => "Changed on disk, added as new",
                };
                self.report(&committed, msg);
                self.cancel_input();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Actions on the selected todo (list indices)
    // -----------------------------------------------------------------------

    pub fn begin_edit(&mut self, index: usize) {
        let list = self.session.list();
        let (Some(item), Some(record)) = (list.item_ref(index), list.get(index)) else {
            return;
        };
        let text = record.raw_text().to_string();
        self.editing = Some(item);
        self.input = text;
        self.cursor = self.input.len();
    }

    /// Toggle completion; the selection follows the todo if it stays visible
    pub fn toggle(&mut self, index: usize) {
        let Some(target) = self.session.list().item_ref(index) else {
            return;
        };
        let now = self.now();
        let Some(committed) = self.session.toggle(target, now) else {
            return;
        };
        self.report(&committed, "Toggled");
        self.nav = match self.visible().iter().position(|&i| i == committed.value.index) {
            Some(pos) => NavState::Selected(pos),
            None => NavState::NoSelection,
        };
    }

    pub fn delete(&mut self, index: usize) {
        let Some(target) = self.session.list().item_ref(index) else {
            return;
        };
        if let Some(committed) = self.session.delete(target) {
            self.report(&committed, "Deleted");
        }
        self.clamp_selection();
    }

    /// Keep the selection inside the visible list
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.nav = match self.nav {
            NavState::Selected(_) if len == 0 => NavState::NoSelection,
            NavState::Selected(i) if i >= len => NavState::Selected(len - 1),
            s => s,
        };
    }

    // -----------------------------------------------------------------------
    // File changes
    // -----------------------------------------------------------------------

    pub fn handle_file_event(&mut self, event: FileEvent) {
        match event {
            FileEvent::ConfigChanged => {
                if let Some(ref dir) = self.dir {
                    self.config = load_config_or_default(dir);
                    self.theme = Theme::from_config(&self.config.ui);
                    self.set_message("Config reloaded", MessageKind::Success);
                }
            }
            FileEvent::TodosChanged => {
                let now = self.now();
                match self.session.reload(now) {
                    Ok(true) => {
                        self.clamp_selection();
                        self.set_message("Reloaded from disk", MessageKind::Success);
                    }
                    Ok(false) => {}
                    Err(e) => self.set_message(format!("Reload failed: {}", e), MessageKind::Error),
                }
            }
        }
    }
}

pub fn run(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    let workspace = discover_workspace(&start)?;
    let config = load_config_or_default(&workspace);
    let session = Session::open_workspace(&workspace, Utc::now())?;
    let watcher = start_watcher(&workspace);

    let mut app = App::new(session, config, Some(workspace));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Without a watcher the TUI still works; external edits just aren't picked up
fn start_watcher(dir: &Path) -> Option<WorkspaceWatcher> {
    match WorkspaceWatcher::start(dir) {
        Ok(w) => Some(w),
        Err(e) => {
            log_event(
                dir,
                LogEntry::new(LogCategory::Watch, "could not start file watcher").field("Error", e),
            );
            None
        }
    }
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&WorkspaceWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if let Some(w) = watcher {
            for evt in w.poll() {
                app.handle_file_event(evt);
            }
        }
        app.expire_message(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

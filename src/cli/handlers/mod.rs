mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::oplog;
use crate::io::session::Session;
use crate::io::store::{FileStore, TodoStore};
use crate::io::workspace;
use crate::model::config::KeyAction;
use crate::model::list::parse_item_id;
use crate::ops::filter::{Filter, visible_indices};
use crate::ops::todo_ops::{badge_count, badge_label};
use crate::parse::resolve_relative_dates;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Settings shared by every command
pub struct Context {
    /// Directory to start workspace discovery from (`-C` or the cwd)
    pub start: PathBuf,
    /// Reference instant for relative dates
    pub now: DateTime<Utc>,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let start = match cli.dir {
            Some(ref dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
            None => std::env::current_dir()?,
        };
        let now = match cli.now {
            Some(ref s) => parse_now(s).ok_or_else(|| format!("invalid --now value: {}", s))?,
            None => Utc::now(),
        };
        Ok(Context {
            start,
            now,
            json: cli.json,
        })
    }

    fn workspace(&self) -> Result<PathBuf, workspace::WorkspaceError> {
        workspace::discover_workspace(&self.start)
    }

    fn session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        let dir = self.workspace()?;
        Ok(Session::open_workspace(&dir, self.now)?)
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_now(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        None => crate::tui::run(cli.dir.as_deref()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(args, &ctx),

            // Read commands
            Commands::List(args) => cmd_list(args, &ctx),
            Commands::Resolve(args) => cmd_resolve(args, &ctx),
            Commands::Badge => cmd_badge(&ctx),
            Commands::Export => cmd_export(&ctx),

            // Write commands
            Commands::Add(args) => cmd_add(args, &ctx),
            Commands::Edit(args) => cmd_edit(args, &ctx),
            Commands::Done(args) => cmd_done(args, &ctx),
            Commands::Rm(args) => cmd_rm(args, &ctx),
            Commands::Import(args) => cmd_import(args, &ctx),
            Commands::Reset(args) => cmd_reset(args, &ctx),

            // Configuration and maintenance
            Commands::Keys(args) => cmd_keys(args, &ctx),
            Commands::Log(args) => cmd_log(args, &ctx),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_id(id: &str) -> Result<usize, String> {
    parse_item_id(id).ok_or_else(|| format!("invalid todo id: {} (expected item<N> or <N>)", id))
}

/// Todo text from the command line words, trimmed. Blank text is rejected.
fn todo_text(words: &[String]) -> Result<String, String> {
    let joined = words.join(" ");
    let text = joined.trim();
    if text.is_empty() {
        return Err("todo text is empty".to_string());
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, ctx: &Context) -> CmdResult {
    let session = ctx.session()?;
    let list = session.list();
    let filter = args.filter.as_deref().map(|f| Filter::parse(f, ctx.now));
    let visible = visible_indices(list.records(), filter.as_ref());

    let rows = visible.iter().filter_map(|&i| Some((list.item_ref(i)?, list.get(i)?)));

    if ctx.json {
        let todos: Vec<TodoJson> = rows.map(|(item, record)| todo_to_json(item, record)).collect();
        println!("{}", serde_json::to_string_pretty(&todos)?);
    } else {
        let id_width = format!("item{}", list.len().saturating_sub(1)).len();
        for (item, record) in rows {
            println!("{}", format_todo_line(item, record, id_width, args.markup));
        }
    }
    Ok(())
}

fn cmd_resolve(args: TextArgs, ctx: &Context) -> CmdResult {
    println!("{}", resolve_relative_dates(&args.joined(), ctx.now));
    Ok(())
}

fn cmd_badge(ctx: &Context) -> CmdResult {
    let session = ctx.session()?;
    let count = badge_count(session.list().records());
    let label = badge_label(count);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&BadgeJson { count, label })?);
    } else {
        println!("{}", label);
    }
    Ok(())
}

fn cmd_export(ctx: &Context) -> CmdResult {
    let dir = ctx.workspace()?;
    let lines = FileStore::new(&dir).load()?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        for line in &lines {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: TextArgs, ctx: &Context) -> CmdResult {
    let text = todo_text(&args.text)?;
    let mut session = ctx.session()?;
    let committed = session.add(&text, ctx.now);
    committed.saved?;
    print_item(ctx, &session, committed.value.index)
}

/// Print a todo by position, as JSON or as `<id>  <text>`
fn print_item(ctx: &Context, session: &Session, index: usize) -> CmdResult {
    let list = session.list();
    let (Some(item), Some(record)) = (list.item_ref(index), list.get(index)) else {
        return Ok(());
    };
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&todo_to_json(item, record))?);
    } else {
        println!("{}", format_todo_line(item, record, 0, false));
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> CmdResult {
    let index = parse_id(&args.id)?;
    let text = todo_text(&args.text)?;
    let mut session = ctx.session()?;

    let item = match session.list().item_ref(index) {
        Some(target) => {
            let committed = session.edit(target, &text, ctx.now);
            committed.saved?;
            committed.value.item()
        }
        None => {
            let committed = session.add(&text, ctx.now);
            committed.saved?;
            if !ctx.json {
                eprintln!("{} not found, added as a new todo", args.id);
            }
            committed.value
        }
    };
    print_item(ctx, &session, item.index)
}

fn cmd_done(args: IdArg, ctx: &Context) -> CmdResult {
    let index = parse_id(&args.id)?;
    let mut session = ctx.session()?;
    let target = session
        .list()
        .item_ref(index)
        .ok_or_else(|| format!("todo not found: {}", args.id))?;
    let committed = session
        .toggle(target, ctx.now)
        .ok_or_else(|| format!("todo not found: {}", args.id))?;
    committed.saved?;
    print_item(ctx, &session, committed.value.index)
}

fn cmd_rm(args: IdArg, ctx: &Context) -> CmdResult {
    let index = parse_id(&args.id)?;
    let mut session = ctx.session()?;
    let target = session
        .list()
        .item_ref(index)
        .ok_or_else(|| format!("todo not found: {}", args.id))?;
    let committed = session
        .delete(target)
        .ok_or_else(|| format!("todo not found: {}", args.id))?;
    committed.saved?;
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(target, &committed.value))?
        );
    } else {
        println!("deleted: {}", committed.value.raw_text());
    }
    Ok(())
}

fn cmd_import(args: ImportArgs, ctx: &Context) -> CmdResult {
    let content = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let mut session = ctx.session()?;
    let committed = session.import(content.lines(), ctx.now);
    committed.saved?;
    println!("imported {} todos", committed.value);
    Ok(())
}

fn cmd_reset(args: ResetArgs, ctx: &Context) -> CmdResult {
    if !args.yes {
        return Err("refusing to delete every todo without --yes".into());
    }
    let mut session = ctx.session()?;
    let count = session.list().len();
    session.reset()?;
    println!("deleted {} todos", count);
    Ok(())
}

// ---------------------------------------------------------------------------
// Configuration and maintenance
// ---------------------------------------------------------------------------

fn cmd_keys(args: KeysCmd, ctx: &Context) -> CmdResult {
    let dir = ctx.workspace()?;
    match args.action.unwrap_or(KeysAction::Show) {
        KeysAction::Show => {
            let config = config_io::load_config_or_default(&dir);
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&keys_to_json(&config.keys))?);
            } else {
                for line in format_keys(&config.keys) {
                    println!("{}", line);
                }
            }
        }
        KeysAction::Set(set) => {
            let action = KeyAction::from_name(&set.action).ok_or_else(|| {
                format!(
                    "unknown action '{}' (expected complete, edit, delete, new or filter)",
                    set.action
                )
            })?;
            let (_, mut doc) = config_io::read_config(&dir)?;
            config_io::set_key(&mut doc, action, &set.key)?;
            config_io::write_config(&dir, &doc)?;
            println!("{} = {}", action.name(), set.key);
        }
    }
    Ok(())
}

fn cmd_log(args: LogArgs, ctx: &Context) -> CmdResult {
    let dir = ctx.workspace()?;
    if args.clear {
        let removed = oplog::clear_log(&dir)?;
        println!("cleared {} log entries", removed);
        return Ok(());
    }

    let entries = oplog::read_entries(&dir, Some(args.limit.unwrap_or(10)));
    if ctx.json {
        let json: Vec<LogEntryJson> = entries.iter().map(log_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else if entries.is_empty() {
        println!("log is empty");
    } else {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!();
            }
            for line in format_log_entry(entry) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tally v", env!("CARGO_PKG_VERSION"), " - todo.txt with relative dates"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Reference time for relative dates (YYYY-MM-DD or RFC 3339, default: now)
    #[arg(long, global = true, value_name = "WHEN")]
    pub now: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .tally workspace in the current directory
    Init(InitArgs),
    /// Add a todo
    Add(TextArgs),
    /// List todos in sorted order
    List(ListArgs),
    /// Replace the text of a todo
    Edit(EditArgs),
    /// Toggle a todo's completion
    Done(IdArg),
    /// Delete a todo
    Rm(IdArg),
    /// Print text with relative dates resolved
    Resolve(TextArgs),
    /// Print the number of open todos with a due date
    Badge,
    /// Add every line of a todo.txt file
    Import(ImportArgs),
    /// Print the raw stored lines
    Export,
    /// Delete all todos
    Reset(ResetArgs),
    /// Show or change shortcut keys
    Keys(KeysCmd),
    /// View or clear the operator log
    Log(LogArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if .tally/ already exists (todos are kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TextArgs {
    /// Todo text, e.g. "(A) call mom @phone due:tomorrow"
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

impl TextArgs {
    pub fn joined(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show todos containing every whitespace-separated term
    #[arg(long, short)]
    pub filter: Option<String>,
    /// Print highlight markup instead of plain text
    #[arg(long)]
    pub markup: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo ID (item3 or 3)
    pub id: String,
    /// New text
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Todo ID (item3 or 3)
    pub id: String,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File with one todo per line
    pub file: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deleting every todo
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct KeysCmd {
    #[command(subcommand)]
    pub action: Option<KeysAction>,
}

#[derive(Subcommand)]
pub enum KeysAction {
    /// Show the current keys (default)
    Show,
    /// Set a key: complete, edit, delete, new or filter
    Set(KeysSetArgs),
}

#[derive(Args)]
pub struct KeysSetArgs {
    /// Action name
    pub action: String,
    /// Single character
    pub key: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Remove all entries
    #[arg(long)]
    pub clear: bool,
}

use clap::Parser;
use tally::cli::commands::Cli;
use tally::cli::handlers;

fn main() {
    let cli = Cli::parse();
    // No subcommand launches the TUI
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

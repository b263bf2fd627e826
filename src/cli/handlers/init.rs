use crate::cli::commands::InitArgs;
use crate::cli::handlers::Context;
use crate::io::workspace;

pub fn cmd_init(args: InitArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if !args.force
        && let Some(parent) = ctx.start.parent()
        && let Ok(existing) = workspace::discover_workspace(parent)
    {
        eprintln!("Note: parent workspace found at {}", existing.display());
    }

    let dir = workspace::init_workspace(&ctx.start, args.force)?;
    println!("Initialized tally workspace: {}", dir.display());
    Ok(())
}

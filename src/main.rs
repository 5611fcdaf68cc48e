//! lad - AppFactory project localizer
//!
//! Downloads the AppFactory host project skeleton, merges a native component
//! source tree into it, and rewrites the project's configuration artifacts so
//! they consistently describe one component identity.

use clap::Parser;

mod acquire;
mod archive;
mod artifacts;
mod cli;
mod commands;
mod config;
mod error;
mod fetch;
mod merge;
#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install => commands::install::run(cli.workspace),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Test => commands::script::run(cli.workspace),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

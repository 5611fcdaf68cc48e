//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lad - AppFactory project localizer
#[derive(Parser, Debug)]
#[command(
    name = "lad",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Assemble a build-ready AppFactory Android project",
    long_about = "lad downloads the AppFactory host project skeleton, merges a native \
                  component source tree into it (a local directory, or a fetched default \
                  component), and rewrites the project's configuration artifacts to \
                  describe the component consistently.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  lad install\n    \
                  lad --workspace ./build-area install\n    \
                  lad list --all\n    \
                  lad test"
)]
pub struct Cli {
    /// Working root (defaults to current directory)
    #[arg(long, short = 'w', global = true)]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the project skeleton and localize the component into it
    ///
    /// Reads config.json from the working root: a non-blank local_src_path
    /// selects the local component source; otherwise the default component is
    /// fetched.
    Install,

    /// List entries in the working root
    List(ListArgs),

    /// Run the external install.bat script from the working root
    Test,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Also display hidden (dot-prefixed) entries
    #[arg(long, short = 'a')]
    pub all: bool,
}

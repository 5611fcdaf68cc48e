//! List command: show the working root's immediate entries
//!
//! Stateless and independent of the install pipeline. Dot-prefixed names are
//! hidden unless `--all` is given.

use std::path::PathBuf;

use crate::cli::ListArgs;
use crate::error::Result;

pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let root = super::resolve_workspace(workspace)?;

    let entries = std::fs::read_dir(&root).map_err(|e| crate::error::file_read_error(&root, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| crate::error::file_read_error(&root, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if args.all || !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();

    println!("{}", names.join(" "));
    Ok(())
}

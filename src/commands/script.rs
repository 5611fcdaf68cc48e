//! Test command: run the external batch script from the working root
//!
//! Independent of the install pipeline; no output contract is consumed, the
//! script's exit status is the only signal surfaced.

use std::path::PathBuf;

use console::style;

use crate::error::{LadError, Result};

/// Fixed script name looked up in the working root
const SCRIPT_NAME: &str = "install.bat";

pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let root = super::resolve_workspace(workspace)?;
    let script = root.join(SCRIPT_NAME);

    let status = std::process::Command::new(&script)
        .current_dir(&root)
        .status()
        .map_err(|e| LadError::IoError {
            message: format!("Failed to run {}: {}", script.display(), e),
        })?;

    if !status.success() {
        return Err(LadError::ScriptFailed {
            status: status.to_string(),
        });
    }

    println!("{}", style("Script completed successfully.").green());
    Ok(())
}

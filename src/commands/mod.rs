//! Command implementations

pub mod install;
pub mod list;
pub mod script;

use std::path::PathBuf;

use crate::error::{LadError, Result};

/// Resolve the working root from the CLI argument or the current directory
///
/// Everything below the CLI layer takes this value explicitly; no component
/// resolves paths against ambient process state.
pub(crate) fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| LadError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}

//! Recursive directory-tree merge
//!
//! Copies a component source tree into a destination tree: regular files are
//! copied under the same name, always overwriting; directories are created
//! when absent and recursed into. Each copy is a blocking `fs::copy`, so
//! every file is fully on disk before the merge returns and the pipeline may
//! move on. Symbolic links are not handled and there is no conflict policy
//! beyond overwrite.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{LadError, Result};

/// Merge `src` into `dest`, invoking `on_copy` after each completed file copy
///
/// `dest` must already exist. Returns the number of files copied.
pub fn merge_tree_with<F>(src: &Path, dest: &Path, on_copy: &mut F) -> Result<usize>
where
    F: FnMut(&Path),
{
    let entries = std::fs::read_dir(src).map_err(|e| crate::error::file_read_error(src, e))?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| crate::error::file_read_error(src, e))?;
        let entry_src = entry.path();
        let entry_dest = dest.join(entry.file_name());

        let file_type = entry
            .file_type()
            .map_err(|e| crate::error::file_read_error(&entry_src, e))?;

        if file_type.is_file() {
            std::fs::copy(&entry_src, &entry_dest)
                .map_err(|e| crate::error::file_write_error(&entry_dest, e))?;
            on_copy(&entry_dest);
            copied += 1;
        } else if file_type.is_dir() {
            if !entry_dest.exists() {
                std::fs::create_dir(&entry_dest)
                    .map_err(|e| crate::error::file_write_error(&entry_dest, e))?;
            }
            copied += merge_tree_with(&entry_src, &entry_dest, on_copy)?;
        }
    }

    Ok(copied)
}

/// Count the regular files under `src`, for merge progress totals
pub fn count_files(src: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| LadError::IoError {
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            total += 1;
        }
    }
    Ok(total)
}

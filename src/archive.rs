//! ZIP archive extraction and remote archive naming
//!
//! Extraction validates every entry path before unpacking so a crafted
//! archive cannot escape the destination directory (zip-slip). Extraction is
//! synchronous: when [`extract`] returns, every entry is on disk — callers
//! never need settle delays to observe the extracted tree.

use std::path::Path;

use crate::error::{LadError, Result};

/// A remote archive endpoint and the names derived from its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArchiveRef {
    /// Full request URL
    pub url: String,
    /// URL path basename, query and fragment stripped
    pub file_name: String,
    /// Basename up to the first dot: the expected extracted directory name
    pub dir_name: String,
}

impl RemoteArchiveRef {
    pub fn new(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url);
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let dir_name = file_name
            .split('.')
            .next()
            .unwrap_or(&file_name)
            .to_string();

        Self {
            url: url.to_string(),
            file_name,
            dir_name,
        }
    }
}

/// Extract a ZIP archive into `dest_dir`
///
/// # Errors
///
/// Returns [`LadError::PathTraversal`] if any entry escapes `dest_dir`,
/// [`LadError::ExtractionFailed`] for corrupt archives, and file write
/// errors for unpacking failures.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .map_err(|e| crate::error::file_read_error(archive_path, e))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| extraction_error(archive_path, e))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| extraction_error(archive_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(LadError::PathTraversal {
                entry: entry.name().to_string(),
            });
        };
        let dest_path = dest_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)
                .map_err(|e| crate::error::file_write_error(&dest_path, e))?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::error::file_write_error(parent, e))?;
        }
        let mut out = std::fs::File::create(&dest_path)
            .map_err(|e| crate::error::file_write_error(&dest_path, e))?;
        std::io::copy(&mut entry, &mut out)
            .map_err(|e| crate::error::file_write_error(&dest_path, e))?;
    }

    Ok(())
}

fn extraction_error(archive_path: &Path, err: zip::result::ZipError) -> LadError {
    LadError::ExtractionFailed {
        path: archive_path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Build a ZIP archive from `(entry path, content)` pairs (test fixtures)
#[cfg(test)]
pub fn write_fixture(archive_path: &Path, entries: &[(&str, &str)]) {
    use std::io::Write;

    let file = std::fs::File::create(archive_path).expect("create fixture archive");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    for (name, content) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish fixture archive");
}

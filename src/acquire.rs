//! Skeleton and default-component acquisition
//!
//! Both paths share the same shape: fetch a remote ZIP, verify it landed on
//! disk, extract it, and rename the extracted top-level directory to a
//! canonical path under the working root. The default-component path stages
//! its extraction in a temporary directory so the single extracted
//! subdirectory can be discovered by listing, whatever the archive named it.

use std::path::{Path, PathBuf};

use crate::archive::{self, RemoteArchiveRef};
use crate::error::{LadError, Result};
use crate::fetch::Fetch;

/// Host project skeleton archive
pub const SKELETON_URL: &str = "http://jenkins.cc.service.sdp.nd/job/fac-fun-android_main_component1471248842292/ws/*zip*/fac-fun-android_main_component1471248842292.zip";

/// Default component archive, used when no local source is configured
pub const DEFAULT_COMPONENT_URL: &str =
    "http://git.sdp.nd/326912/test-project/repository/archive.zip?ref=master";

/// Canonical skeleton directory name under the working root
pub const PROJECT_DIR: &str = "project";

/// Canonical default-component directory name under the working root
const DEFAULT_COMPONENT_DIR: &str = "default_component";

/// Subpath inside the default component that holds the mergeable module
const DEFAULT_COMPONENT_MODULE: &str = "module";

/// Fetch and extract the project skeleton, returning the canonical project root
///
/// The archive is downloaded into the working root, extracted in place, and
/// the extracted top-level directory (derived from the archive name) is
/// renamed to `project`. The downloaded archive itself stays on disk.
pub fn skeleton(fetcher: &dyn Fetch, root: &Path, url: &str) -> Result<PathBuf> {
    let archive = RemoteArchiveRef::new(url);
    let archive_path = root.join(&archive.file_name);

    fetcher.fetch(&archive.url, &archive_path)?;
    verify_archive(&archive_path)?;

    archive::extract(&archive_path, root)?;

    let extracted = root.join(&archive.dir_name);
    let project = root.join(PROJECT_DIR);
    std::fs::rename(&extracted, &project)
        .map_err(|e| crate::error::file_write_error(&project, e))?;

    Ok(project)
}

/// Fetch and extract the default component, returning its module directory
///
/// Extraction is staged in a temporary directory under the working root; the
/// single extracted subdirectory is discovered by listing and renamed to
/// `default_component`. The staging directory and the downloaded archive are
/// removed afterwards. Readiness is the synchronous return of the extraction
/// call, never a wall-clock delay.
pub fn default_component(fetcher: &dyn Fetch, root: &Path, url: &str) -> Result<PathBuf> {
    let archive = RemoteArchiveRef::new(url);
    let archive_path = root.join(&archive.file_name);

    fetcher.fetch(&archive.url, &archive_path)?;
    verify_archive(&archive_path)?;

    // Staged under the working root so the rename below never crosses a
    // filesystem boundary.
    let staging = tempfile::tempdir_in(root)?;
    archive::extract(&archive_path, staging.path())?;

    let extracted = discover_extracted_dir(staging.path(), &archive_path)?;
    let component = root.join(DEFAULT_COMPONENT_DIR);
    std::fs::rename(&extracted, &component)
        .map_err(|e| crate::error::file_write_error(&component, e))?;

    std::fs::remove_file(&archive_path)
        .map_err(|e| crate::error::file_write_error(&archive_path, e))?;
    staging.close()?;

    Ok(component.join(DEFAULT_COMPONENT_MODULE))
}

/// The transfer must leave the archive on disk before extraction may start
fn verify_archive(archive_path: &Path) -> Result<()> {
    if archive_path.exists() {
        Ok(())
    } else {
        Err(LadError::ArchiveMissing {
            path: archive_path.display().to_string(),
        })
    }
}

/// Find the single top-level directory the archive extracted to
fn discover_extracted_dir(staging: &Path, archive_path: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(staging).map_err(|e| crate::error::file_read_error(staging, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| crate::error::file_read_error(staging, e))?;
        if entry.path().is_dir() {
            return Ok(entry.path());
        }
    }

    Err(LadError::ExtractionFailed {
        path: archive_path.display().to_string(),
        reason: "archive contains no top-level directory".to_string(),
    })
}

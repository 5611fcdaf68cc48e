//! Shared fixtures for unit tests: a canned fetcher and seeded project trees

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::artifacts;
use crate::error::{LadError, Result};
use crate::fetch::Fetch;

/// A [`Fetch`] implementation that serves pre-built archives from disk
///
/// Unknown URLs answer with a 404-style transfer failure, mirroring the
/// production error path.
pub struct FixtureFetcher {
    responses: HashMap<String, PathBuf>,
}

impl FixtureFetcher {
    pub fn empty() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    pub fn single(url: &str, archive: &Path) -> Self {
        let mut fetcher = Self::empty();
        fetcher.insert(url, archive);
        fetcher
    }

    pub fn insert(&mut self, url: &str, archive: &Path) {
        self.responses
            .insert(url.to_string(), archive.to_path_buf());
    }
}

impl Fetch for FixtureFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let Some(source) = self.responses.get(url) else {
            return Err(LadError::TransferFailed {
                url: url.to_string(),
                status: 404,
            });
        };
        std::fs::copy(source, dest).map_err(|e| crate::error::file_write_error(dest, e))?;
        Ok(())
    }
}

/// The six artifacts a freshly extracted skeleton ships, as `(path, content)`
pub fn skeleton_artifacts() -> [(&'static str, &'static str); 6] {
    [
        (artifacts::SETTINGS_GRADLE, "include ':app'\n"),
        (artifacts::APP_BUILD_CONFIG, "// app-factory component hooks\n"),
        (artifacts::ANNOUNCE_MANIFEST, r#"{"native": []}"#),
        (artifacts::COMPONENTS_MANIFEST, "[]"),
        (artifacts::BIZ_ENV_MANIFEST, "[]"),
        (artifacts::BUILD_MANIFEST, "[]"),
    ]
}

/// Create an extracted `project/` tree under `root` with the six artifacts
pub fn seed_project_tree(root: &Path) -> PathBuf {
    let project = root.join("project");
    for (relative, content) in skeleton_artifacts() {
        let path = project.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create artifact parent");
        }
        std::fs::write(&path, content).expect("seed artifact");
    }
    project
}

/// Build a skeleton ZIP whose top-level directory matches the name derived
/// from `url`, containing the six artifacts
pub fn skeleton_zip(url: &str, archive_path: &Path) {
    let dir = crate::archive::RemoteArchiveRef::new(url).dir_name;
    let entries: Vec<(String, &str)> = skeleton_artifacts()
        .into_iter()
        .map(|(relative, content)| (format!("{dir}/{relative}"), content))
        .collect();
    let borrowed: Vec<(&str, &str)> = entries
        .iter()
        .map(|(name, content)| (name.as_str(), *content))
        .collect();
    crate::archive::write_fixture(archive_path, &borrowed);
}

/// Build a default-component ZIP with a `module/` subtree under one top dir
pub fn component_zip(archive_path: &Path) {
    crate::archive::write_fixture(
        archive_path,
        &[
            (
                "test-project-master-0a1b2c/module/build.gradle",
                "apply plugin: 'com.android.library'\n",
            ),
            (
                "test-project-master-0a1b2c/module/src/main/java/Local.java",
                "class Local {}",
            ),
        ],
    );
}

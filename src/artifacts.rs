//! Configuration artifact synchronization
//!
//! Stamps one resolved identity into the six project artifacts: two
//! append-only text files and four JSON manifests rewritten whole. All six
//! new contents are computed in memory before a single byte is written, so a
//! manifest that fails to parse aborts the run with every artifact untouched.
//! The writes themselves run inside an [`ArtifactTransaction`]: each goes
//! through a temp file and an atomic rename, and a mid-sequence failure
//! restores the artifacts already committed from their backups.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::config::{Identity, LocalizationConfig, Mode};
use crate::error::{LadError, Result};

/// Build-settings file, append-only text
pub const SETTINGS_GRADLE: &str = "settings.gradle";
/// App build-config file, append-only text
pub const APP_BUILD_CONFIG: &str = "app/app-factory-component.gradle";
/// Announce manifest, JSON object with a `native` array
pub const ANNOUNCE_MANIFEST: &str = "app/assets/app_factory/app/announce.json";
/// Components manifest, JSON array
pub const COMPONENTS_MANIFEST: &str = "app/assets/app_factory/app/components.json";
/// Biz-environment manifest, JSON array
pub const BIZ_ENV_MANIFEST: &str = "app/assets/app_factory/zh-CN/components/biz_env.json";
/// Build manifest, JSON array
pub const BUILD_MANIFEST: &str = "app/assets/app_factory/zh-CN/components/build.json";

const SETTINGS_INCLUDE: &str = "\ninclude ':lib_component'\n";
const DEPENDENCY_BLOCK: &str = "\ndependencies{compile project(\":lib_component\")}\n";

/// Stamp `identity` into all six artifacts under `project_root`
///
/// Appends are not idempotent: running twice yields two entries in every
/// list-typed manifest and duplicated lines in both text artifacts, which is
/// the expected append-only behavior.
pub fn synchronize(
    project_root: &Path,
    identity: &Identity,
    mode: Mode,
    config: &LocalizationConfig,
) -> Result<()> {
    let staged = stage_all(project_root, identity, mode, config)?;

    let mut transaction = ArtifactTransaction::begin(&staged)?;
    for write in &staged {
        commit_write(&write.path, &write.content)?;
    }
    transaction.commit();

    Ok(())
}

/// One fully computed artifact rewrite, not yet on disk
struct StagedWrite {
    path: PathBuf,
    content: String,
}

/// Compute all six new artifact contents in memory
fn stage_all(
    project_root: &Path,
    identity: &Identity,
    mode: Mode,
    config: &LocalizationConfig,
) -> Result<Vec<StagedWrite>> {
    let mut staged = Vec::with_capacity(6);

    staged.push(stage_append(
        project_root.join(SETTINGS_GRADLE),
        SETTINGS_INCLUDE.to_string(),
    )?);
    staged.push(stage_append(
        project_root.join(APP_BUILD_CONFIG),
        dependency_block(mode, config),
    )?);
    staged.push(stage_announce(
        project_root.join(ANNOUNCE_MANIFEST),
        identity,
    )?);
    staged.push(stage_array_push(
        project_root.join(COMPONENTS_MANIFEST),
        components_entry(identity),
    )?);
    staged.push(stage_array_push(
        project_root.join(BIZ_ENV_MANIFEST),
        biz_env_entry(identity),
    )?);
    staged.push(stage_array_push(
        project_root.join(BUILD_MANIFEST),
        build_entry(identity, config.event_value(mode), config.properties_value(mode)),
    )?);

    Ok(staged)
}

/// Dependency declaration appended to the app build-config artifact
///
/// Custom mode carries an extra exclude/configuration block derived from the
/// validated `exclude` rule; Default mode omits it.
fn dependency_block(mode: Mode, config: &LocalizationConfig) -> String {
    match mode {
        Mode::Default => DEPENDENCY_BLOCK.to_string(),
        Mode::Custom => {
            let exclude = config.exclude.as_deref().unwrap_or_default();
            format!("{DEPENDENCY_BLOCK}android{{configurations{{{exclude}}}}}\n")
        }
    }
}

fn announce_entry(identity: &Identity) -> Value {
    json!({
        "android": identity.class,
        "component": {
            "name": identity.name,
            "namespace": identity.namespace,
        },
        "ios": "",
    })
}

fn components_entry(identity: &Identity) -> Value {
    json!({
        "component": {
            "name": identity.name,
            "namespace": identity.namespace,
        },
        "native-android": { "class": identity.class },
        "native-ios": { "class": "" },
        "type": ["native-ios", "native-android"],
    })
}

fn biz_env_entry(identity: &Identity) -> Value {
    json!({
        "component": {
            "namespace": identity.namespace,
            "name": identity.name,
        },
        "env": "8",
        "__namespace": format!("{}.{}", identity.namespace, identity.name),
    })
}

fn build_entry(identity: &Identity, event: Value, properties: Value) -> Value {
    json!({
        "component": {
            "name": identity.name,
            "namespace": identity.namespace,
        },
        "event": event,
        "properties": properties,
        "version": "release",
    })
}

/// Stage an append to a text artifact
fn stage_append(path: PathBuf, suffix: String) -> Result<StagedWrite> {
    let existing =
        std::fs::read_to_string(&path).map_err(|e| crate::error::file_read_error(&path, e))?;
    let content = format!("{existing}{suffix}");
    Ok(StagedWrite { path, content })
}

/// Stage a push onto the announce manifest's `native` array
fn stage_announce(path: PathBuf, identity: &Identity) -> Result<StagedWrite> {
    let mut manifest = parse_manifest(&path)?;
    let native = manifest
        .get_mut("native")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| LadError::ManifestParseFailed {
            path: path.display().to_string(),
            reason: "expected an object with a `native` array".to_string(),
        })?;
    native.push(announce_entry(identity));

    serialize_manifest(path, &manifest)
}

/// Stage a push onto an array-typed manifest
fn stage_array_push(path: PathBuf, entry: Value) -> Result<StagedWrite> {
    let mut manifest = parse_manifest(&path)?;
    let array = manifest
        .as_array_mut()
        .ok_or_else(|| LadError::ManifestParseFailed {
            path: path.display().to_string(),
            reason: "expected a top-level JSON array".to_string(),
        })?;
    array.push(entry);

    serialize_manifest(path, &manifest)
}

fn parse_manifest(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::file_read_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| LadError::ManifestParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn serialize_manifest(path: PathBuf, manifest: &Value) -> Result<StagedWrite> {
    let content =
        serde_json::to_string_pretty(manifest).map_err(|e| LadError::ManifestParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(StagedWrite { path, content })
}

/// Write a staged artifact through a temp file in the same directory, then
/// rename it into place
fn commit_write(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| crate::error::file_write_error(path, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| crate::error::file_write_error(path, e))?;
    temp.persist(path)
        .map_err(|e| crate::error::file_write_error(path, e.error))?;
    Ok(())
}

/// Backup of one artifact's pre-synchronization content
#[derive(Debug)]
struct ArtifactBackup {
    path: PathBuf,
    content: Vec<u8>,
}

/// Restores the artifacts to their backed-up state unless committed
///
/// Taken at the start of the write sequence; dropping an uncommitted
/// transaction rewrites every backed-up artifact, so a mid-sequence write
/// failure cannot leave the six artifacts mutually inconsistent.
#[derive(Debug)]
pub struct ArtifactTransaction {
    backups: Vec<ArtifactBackup>,
    committed: bool,
}

impl ArtifactTransaction {
    /// Back up the current content of every staged artifact
    fn begin(staged: &[StagedWrite]) -> Result<Self> {
        let mut backups = Vec::with_capacity(staged.len());
        for write in staged {
            let content = std::fs::read(&write.path)
                .map_err(|e| crate::error::file_read_error(&write.path, e))?;
            backups.push(ArtifactBackup {
                path: write.path.clone(),
                content,
            });
        }
        Ok(Self {
            backups,
            committed: false,
        })
    }

    /// Mark the write sequence complete, disarming the rollback
    fn commit(&mut self) {
        self.committed = true;
    }
}

impl Drop for ArtifactTransaction {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for backup in &self.backups {
            if let Err(e) = std::fs::write(&backup.path, &backup.content) {
                eprintln!(
                    "Warning: failed to restore {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::seed_project_tree;
    use tempfile::TempDir;

    fn custom_config() -> LocalizationConfig {
        LocalizationConfig {
            local_src_path: Some("./src".to_string()),
            exclude: Some("app/ Icon.png".to_string()),
            class: Some("com.x.Y".to_string()),
            name: Some("foo".to_string()),
            namespace: Some("com.x".to_string()),
            event: Some(json!({"onReady": "init"})),
            properties: Some(json!({"color": "red"})),
        }
    }

    fn read_json(project: &Path, artifact: &str) -> Value {
        let content = std::fs::read_to_string(project.join(artifact)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_custom_mode_stamps_one_identity_everywhere() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        let config = custom_config();
        let identity = config.identity(Mode::Custom);

        synchronize(&project, &identity, Mode::Custom, &config).unwrap();

        let settings = std::fs::read_to_string(project.join(SETTINGS_GRADLE)).unwrap();
        assert!(settings.ends_with("\ninclude ':lib_component'\n"));

        let app_gradle = std::fs::read_to_string(project.join(APP_BUILD_CONFIG)).unwrap();
        assert!(app_gradle.contains("dependencies{compile project(\":lib_component\")}"));
        assert!(app_gradle.contains("android{configurations{app/ Icon.png}}"));

        let announce = read_json(&project, ANNOUNCE_MANIFEST);
        assert_eq!(
            announce["native"][0],
            json!({
                "android": "com.x.Y",
                "component": {"name": "foo", "namespace": "com.x"},
                "ios": "",
            })
        );

        let components = read_json(&project, COMPONENTS_MANIFEST);
        assert_eq!(components[0]["component"]["name"], "foo");
        assert_eq!(components[0]["native-android"]["class"], "com.x.Y");
        assert_eq!(components[0]["native-ios"]["class"], "");
        assert_eq!(
            components[0]["type"],
            json!(["native-ios", "native-android"])
        );

        let biz_env = read_json(&project, BIZ_ENV_MANIFEST);
        assert_eq!(biz_env[0]["env"], "8");
        assert_eq!(biz_env[0]["__namespace"], "com.x.foo");

        let build = read_json(&project, BUILD_MANIFEST);
        assert_eq!(build[0]["event"], json!({"onReady": "init"}));
        assert_eq!(build[0]["properties"], json!({"color": "red"}));
        assert_eq!(build[0]["version"], "release");

        // Cross-artifact agreement on the identity triple.
        for (name, namespace) in [
            (
                announce["native"][0]["component"]["name"].clone(),
                announce["native"][0]["component"]["namespace"].clone(),
            ),
            (
                components[0]["component"]["name"].clone(),
                components[0]["component"]["namespace"].clone(),
            ),
            (
                biz_env[0]["component"]["name"].clone(),
                biz_env[0]["component"]["namespace"].clone(),
            ),
            (
                build[0]["component"]["name"].clone(),
                build[0]["component"]["namespace"].clone(),
            ),
        ] {
            assert_eq!(name, "foo");
            assert_eq!(namespace, "com.x");
        }
    }

    #[test]
    fn test_default_mode_uses_canonical_identity() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        let config = LocalizationConfig::default();
        let identity = config.identity(Mode::Default);

        synchronize(&project, &identity, Mode::Default, &config).unwrap();

        let app_gradle = std::fs::read_to_string(project.join(APP_BUILD_CONFIG)).unwrap();
        assert!(!app_gradle.contains("configurations"));

        let announce = read_json(&project, ANNOUNCE_MANIFEST);
        assert_eq!(announce["native"][0]["android"], "com.nd.sdp.LocalComponent");

        let components = read_json(&project, COMPONENTS_MANIFEST);
        assert_eq!(components[0]["component"]["name"], "local-default-component");
        assert_eq!(components[0]["component"]["namespace"], "com.nd.sdp");

        let build = read_json(&project, BUILD_MANIFEST);
        assert_eq!(build[0]["event"], json!({}));
        assert_eq!(build[0]["properties"], json!({}));
    }

    #[test]
    fn test_synchronize_twice_appends_twice() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        let config = custom_config();
        let identity = config.identity(Mode::Custom);

        synchronize(&project, &identity, Mode::Custom, &config).unwrap();
        synchronize(&project, &identity, Mode::Custom, &config).unwrap();

        for artifact in [COMPONENTS_MANIFEST, BIZ_ENV_MANIFEST, BUILD_MANIFEST] {
            let manifest = read_json(&project, artifact);
            assert_eq!(manifest.as_array().unwrap().len(), 2, "{artifact}");
        }
        let announce = read_json(&project, ANNOUNCE_MANIFEST);
        assert_eq!(announce["native"].as_array().unwrap().len(), 2);

        let settings = std::fs::read_to_string(project.join(SETTINGS_GRADLE)).unwrap();
        assert_eq!(settings.matches("include ':lib_component'").count(), 2);
        let app_gradle = std::fs::read_to_string(project.join(APP_BUILD_CONFIG)).unwrap();
        assert_eq!(app_gradle.matches("dependencies{").count(), 2);
    }

    #[test]
    fn test_unparsable_manifest_aborts_before_any_write() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        std::fs::write(project.join(BIZ_ENV_MANIFEST), "[broken").unwrap();
        let config = custom_config();
        let identity = config.identity(Mode::Custom);

        let err = synchronize(&project, &identity, Mode::Custom, &config).unwrap_err();
        match err {
            LadError::ManifestParseFailed { path, .. } => {
                assert!(path.contains("biz_env.json"));
            }
            other => panic!("expected ManifestParseFailed, got {other}"),
        }

        // Nothing else was touched: staging happens before the first write.
        let settings = std::fs::read_to_string(project.join(SETTINGS_GRADLE)).unwrap();
        assert!(!settings.contains("lib_component"));
        let announce = read_json(&project, ANNOUNCE_MANIFEST);
        assert!(announce["native"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_manifest_shape_names_artifact() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        std::fs::write(project.join(ANNOUNCE_MANIFEST), "{}").unwrap();
        let config = custom_config();
        let identity = config.identity(Mode::Custom);

        let err = synchronize(&project, &identity, Mode::Custom, &config).unwrap_err();
        match err {
            LadError::ManifestParseFailed { path, reason } => {
                assert!(path.contains("announce.json"));
                assert!(reason.contains("native"));
            }
            other => panic!("expected ManifestParseFailed, got {other}"),
        }
    }

    #[test]
    fn test_uncommitted_transaction_restores_backups() {
        let temp = TempDir::new().unwrap();
        let project = seed_project_tree(temp.path());
        let settings_path = project.join(SETTINGS_GRADLE);
        let original = std::fs::read_to_string(&settings_path).unwrap();

        {
            let staged = vec![StagedWrite {
                path: settings_path.clone(),
                content: String::new(),
            }];
            let _transaction = ArtifactTransaction::begin(&staged).unwrap();
            std::fs::write(&settings_path, "clobbered").unwrap();
            // Dropped without commit: rollback restores the original.
        }

        assert_eq!(
            std::fs::read_to_string(&settings_path).unwrap(),
            original
        );
    }
}

//! Run configuration for the install pipeline
//!
//! `config.json` is read once per run from the working root. The file decides
//! the operating mode: a non-blank `local_src_path` selects Custom mode and
//! makes every identity field mandatory; otherwise the run falls back to the
//! fetched default component with a fixed canonical identity.

use std::path::Path;

use serde::Deserialize;

use crate::error::{LadError, Result};

/// Operating mode derived from `local_src_path`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Identity values taken from user-supplied configuration
    Custom,
    /// A fixed placeholder identity is used instead of user input
    Default,
}

/// The (name, namespace, class) triple stamped into every artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub namespace: String,
    pub class: String,
}

impl Identity {
    /// The canonical identity substituted in Default mode
    pub fn canonical_default() -> Self {
        Self {
            name: "local-default-component".to_string(),
            namespace: "com.nd.sdp".to_string(),
            class: "com.nd.sdp.LocalComponent".to_string(),
        }
    }
}

/// Parsed `config.json`
///
/// Every field is optional at parse time; [`LocalizationConfig::validate`]
/// enforces the mode-dependent requirements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizationConfig {
    #[serde(default)]
    pub local_src_path: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub event: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
}

/// True when the value is absent or contains only whitespace
fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

impl LocalizationConfig {
    /// Read and parse `config.json` from `path`
    ///
    /// Aborts the run before any other I/O: a missing file maps to
    /// [`LadError::ConfigNotFound`], anything unparsable to
    /// [`LadError::ConfigParseFailed`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LadError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                crate::error::file_read_error(path, e)
            }
        })?;

        serde_json::from_str(&content).map_err(|e| LadError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Determine the mode and enforce the Custom-mode field requirements
    ///
    /// Fails fast on the first missing field; no error aggregation. Default
    /// mode performs no further checks.
    pub fn validate(&self) -> Result<Mode> {
        if is_blank(self.local_src_path.as_ref()) {
            return Ok(Mode::Default);
        }

        if is_blank(self.exclude.as_ref()) {
            return Err(LadError::ConfigFieldMissing { field: "exclude" });
        }
        if is_blank(self.class.as_ref()) {
            return Err(LadError::ConfigFieldMissing { field: "class" });
        }
        if is_blank(self.name.as_ref()) {
            return Err(LadError::ConfigFieldMissing { field: "name" });
        }
        if is_blank(self.namespace.as_ref()) {
            return Err(LadError::ConfigFieldMissing { field: "namespace" });
        }
        if self.event.is_none() {
            return Err(LadError::ConfigFieldMissing { field: "event" });
        }
        if self.properties.is_none() {
            return Err(LadError::ConfigFieldMissing { field: "properties" });
        }

        Ok(Mode::Custom)
    }

    /// Resolve the identity stamped into the artifacts
    ///
    /// Only meaningful after [`validate`](Self::validate) returned the mode:
    /// in Custom mode the fields are known present, so the unwraps are
    /// encoded as defaults that validation has already ruled out.
    pub fn identity(&self, mode: Mode) -> Identity {
        match mode {
            Mode::Default => Identity::canonical_default(),
            Mode::Custom => Identity {
                name: self.name.clone().unwrap_or_default(),
                namespace: self.namespace.clone().unwrap_or_default(),
                class: self.class.clone().unwrap_or_default(),
            },
        }
    }

    /// `event` payload for the build manifest (empty object in Default mode)
    pub fn event_value(&self, mode: Mode) -> serde_json::Value {
        match mode {
            Mode::Custom => self.event.clone().unwrap_or_else(|| serde_json::json!({})),
            Mode::Default => serde_json::json!({}),
        }
    }

    /// `properties` payload for the build manifest (empty object in Default mode)
    pub fn properties_value(&self, mode: Mode) -> serde_json::Value {
        match mode {
            Mode::Custom => self
                .properties
                .clone()
                .unwrap_or_else(|| serde_json::json!({})),
            Mode::Default => serde_json::json!({}),
        }
    }
}

//! Error types and handling for lad
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every failure the pipeline can hit maps to exactly one variant so the
//! install command can abort deterministically instead of logging and
//! continuing.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for lad operations
#[derive(Error, Diagnostic, Debug)]
pub enum LadError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(lad::config::not_found),
        help("Create a config.json in the working root (an empty object installs the default component)")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(
        code(lad::config::parse_failed),
        help("config.json must be a valid JSON object")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Required configuration field '{field}' is missing or blank")]
    #[diagnostic(
        code(lad::config::field_missing),
        help("When local_src_path is set, exclude, class, name, namespace, event and properties are all required")
    )]
    ConfigFieldMissing { field: &'static str },

    // Transfer errors
    #[error("Transfer failed for {url}: HTTP status {status}")]
    #[diagnostic(
        code(lad::transfer::bad_status),
        help("Check that the endpoint is reachable and serves the archive")
    )]
    TransferFailed { url: String, status: u16 },

    #[error("Transfer failed for {url}: {reason}")]
    #[diagnostic(code(lad::transfer::http_error))]
    HttpError { url: String, reason: String },

    // Archive errors
    #[error("Downloaded archive does not exist: {path}")]
    #[diagnostic(
        code(lad::archive::missing),
        help("The transfer reported success but left no file on disk; retry the install")
    )]
    ArchiveMissing { path: String },

    #[error("Failed to extract archive {path}: {reason}")]
    #[diagnostic(code(lad::archive::extraction_failed))]
    ExtractionFailed { path: String, reason: String },

    #[error("Archive entry escapes the destination directory: {entry}")]
    #[diagnostic(
        code(lad::archive::path_traversal),
        help("The archive contains absolute or parent-relative paths and cannot be extracted safely")
    )]
    PathTraversal { entry: String },

    // Component source errors
    #[error("Component source directory not found: {path}")]
    #[diagnostic(
        code(lad::component::source_missing),
        help("local_src_path must point to an existing directory relative to the working root")
    )]
    ComponentSourceMissing { path: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(lad::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(lad::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(lad::fs::io_error))]
    IoError { message: String },

    // Artifact errors
    #[error("Failed to parse project artifact: {path}")]
    #[diagnostic(
        code(lad::artifact::parse_failed),
        help("The project skeleton ships this file as JSON; it must parse before it can be rewritten")
    )]
    ManifestParseFailed { path: String, reason: String },

    // Script entry point
    #[error("External script exited with {status}")]
    #[diagnostic(code(lad::script::failed))]
    ScriptFailed { status: String },
}

impl From<std::io::Error> for LadError {
    fn from(err: std::io::Error) -> Self {
        LadError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LadError {
    fn from(err: serde_json::Error) -> Self {
        LadError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, LadError>;

/// Maps an IO error onto [`LadError::FileReadFailed`] for `path`.
pub fn file_read_error(path: &std::path::Path, err: std::io::Error) -> LadError {
    LadError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Maps an IO error onto [`LadError::FileWriteFailed`] for `path`.
pub fn file_write_error(path: &std::path::Path, err: std::io::Error) -> LadError {
    LadError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

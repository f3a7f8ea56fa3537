use std::path::PathBuf;

use thiserror::Error;

/// Build-level error type.
/// Every failure of a run maps to exactly one variant; `report()` renders the
/// user-facing status line printed to stdout before the process exits.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Variant '{variant}' not found at {}", dir.display())]
    VariantNotFound { variant: String, dir: PathBuf },

    #[error("{kind} not found at {}", path.display())]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("Malformed JSON in {}: {source}", path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema in {}: {message}", path.display())]
    InvalidSchema { path: PathBuf, message: String },

    #[error("Schema validation failed: {message}")]
    SchemaViolation { message: String, path: String },

    #[error("Template not found: {name}")]
    TemplateMissing { name: String },

    #[error("Template rendering failed: {0}")]
    Render(#[source] minijinja::Error),

    #[error("{compiler} not found")]
    CompilerUnavailable { compiler: String },

    #[error("Compilation failed (exit code {code:?})")]
    CompilerFailed { code: Option<i32>, log_tail: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Status lines shown to the user for this failure.
    pub fn report(&self) -> String {
        match self {
            BuildError::SchemaViolation { message, path } => {
                format!("✗ Schema validation failed: {message}\n  Path: {path}")
            }
            BuildError::CompilerUnavailable { compiler } => {
                format!("✗ {compiler} not found. Install TeX Live or MacTeX.")
            }
            BuildError::CompilerFailed { log_tail, .. } => {
                format!("✗ Compilation failed\n{log_tail}")
            }
            other => format!("✗ {other}"),
        }
    }
}

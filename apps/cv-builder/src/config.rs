use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::compile::DEFAULT_COMPILER;
use crate::render::latex::DEFAULT_RAW_MARKER;

/// Runtime configuration loaded from environment variables (and `.env`).
/// Command-line flags take precedence over every field; see `cli`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub templates_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: String,
    pub raw_marker: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_marker = var("CV_RAW_MARKER").unwrap_or_else(|| DEFAULT_RAW_MARKER.to_string());
        check_raw_marker(&raw_marker)?;

        Ok(Config {
            templates_dir: var("CV_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(bundled_templates_dir),
            data_dir: var("CV_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            output_dir: var("CV_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
            compiler: var("CV_LATEX_COMPILER").unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            raw_marker,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        })
    }
}

/// An empty marker would turn every `{...}` group into a raw span.
pub fn check_raw_marker(marker: &str) -> Result<()> {
    if marker.trim().is_empty() {
        bail!("raw marker must not be empty");
    }
    Ok(())
}

/// Variants shipped with the crate.
pub fn bundled_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

//! Variant build: orchestrates one run end to end.
//!
//! Flow: check variant/data paths → load data → validate against schema →
//!       render template → write `.tex` → (optional) compile to PDF.
//!
//! Each run handles exactly one variant and shares nothing with other runs.
//! User-facing status lines go to the supplied writer; diagnostics go through
//! `tracing`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::compile::LatexCompiler;
use crate::config::Config;
use crate::errors::BuildError;
use crate::render::{self, latex::LatexEscaper};
use crate::schema;

pub const DATA_FILE: &str = "data.json";
pub const SCHEMA_FILE: &str = "schema.json";
pub const DEFAULT_VARIANT: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Options and results
// ────────────────────────────────────────────────────────────────────────────

/// Everything a run needs. Paths are explicit so the pipeline never depends
/// on the working directory or the install location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub variant: String,
    pub templates_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: String,
    pub raw_marker: String,
    pub compile: bool,
    pub skip_validation: bool,
}

impl BuildOptions {
    pub fn from_config(config: &Config, variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            templates_dir: config.templates_dir.clone(),
            data_dir: config.data_dir.clone(),
            output_dir: config.output_dir.clone(),
            compiler: config.compiler.clone(),
            raw_marker: config.raw_marker.clone(),
            compile: false,
            skip_validation: false,
        }
    }

    /// `<templates>/<variant>`: template, schema and style files.
    pub fn variant_dir(&self) -> PathBuf {
        self.templates_dir.join(&self.variant)
    }

    /// `<data>/<variant>/data.json`
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(&self.variant).join(DATA_FILE)
    }

    pub fn schema_file(&self) -> PathBuf {
        self.variant_dir().join(SCHEMA_FILE)
    }

    /// `<output>/<variant>`: receives the `.tex` file and compiler output.
    pub fn output_variant_dir(&self) -> PathBuf {
        self.output_dir.join(&self.variant)
    }
}

/// Artifacts produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub tex_file: PathBuf,
    pub pdf_file: Option<PathBuf>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the build for `options.variant`, writing status lines to `out`.
///
/// Steps:
/// 1. Check the variant directory and data file exist
/// 2. Create `<output>/<variant>`
/// 3. Load the data tree
/// 4. Validate it against `schema.json` (unless skipped)
/// 5. Render `template.tex.j2` → `<variant>.tex`
/// 6. Compile to PDF (when requested)
pub fn run(options: &BuildOptions, out: &mut dyn Write) -> Result<BuildReport, BuildError> {
    // Step 1: Resolve paths
    let variant_dir = options.variant_dir();
    let data_file = options.data_file();

    if !variant_dir.is_dir() {
        return Err(BuildError::VariantNotFound {
            variant: options.variant.clone(),
            dir: variant_dir,
        });
    }
    if !data_file.is_file() {
        return Err(BuildError::MissingFile {
            kind: "Data file",
            path: data_file,
        });
    }

    // Step 2: Output directory
    let output_dir = options.output_variant_dir();
    fs::create_dir_all(&output_dir).map_err(|e| BuildError::io(&output_dir, e))?;

    // Step 3: Load data
    status(out, format_args!("Building variant: {}", options.variant));
    let cv_data = load_json(&data_file)?;
    debug!("Loaded {}", data_file.display());

    // Step 4: Validate
    if options.skip_validation {
        info!("Schema validation skipped for '{}'", options.variant);
    } else {
        let schema_file = options.schema_file();
        let schema = load_json_with_kind(&schema_file, "Schema file")?;
        schema::validate_cv(&cv_data, &schema, &schema_file)?;
        status(out, format_args!("✓ CV data validates against schema"));
    }

    // Step 5: Render
    let escaper = LatexEscaper::new(&options.raw_marker);
    let tex_file =
        render::build_variant(&variant_dir, &output_dir, &options.variant, &cv_data, escaper)?;
    status(out, format_args!("✓ Generated {}", tex_file.display()));

    // Step 6: Compile
    let pdf_file = if options.compile {
        let name = tex_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        status(out, format_args!("  Compiling {name}..."));

        let compiler = LatexCompiler::new(&options.compiler);
        debug!("Compiling with '{}'", compiler.program());
        let pdf = compiler.compile(&tex_file, &variant_dir)?;
        status(out, format_args!("✓ Compiled {}", pdf.display()));
        Some(pdf)
    } else {
        None
    };

    status(out, format_args!("\nDone!"));
    Ok(BuildReport { tex_file, pdf_file })
}

/// Reads and parses a JSON file.
pub fn load_json(path: &Path) -> Result<Value, BuildError> {
    load_json_with_kind(path, "File")
}

fn load_json_with_kind(path: &Path, kind: &'static str) -> Result<Value, BuildError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BuildError::MissingFile {
            kind,
            path: path.to_path_buf(),
        },
        _ => BuildError::io(path, e),
    })?;

    serde_json::from_str(&text).map_err(|source| BuildError::MalformedInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Status lines are best effort; a closed stdout must not fail the build.
fn status(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    let _ = writeln!(out, "{line}");
}

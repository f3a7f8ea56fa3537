//! LaTeX → PDF compilation through an external compiler (pdflatex by default).
//!
//! The compiler runs once, blocking, with the rendered file's directory as
//! both working and output directory. Style files shipped with the variant
//! are copied there first so `\usepackage{...}` resolves.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::errors::BuildError;

pub const DEFAULT_COMPILER: &str = "pdflatex";

/// How much of the compiler's log is shown when it fails.
pub const LOG_TAIL_CHARS: usize = 2000;

const STYLE_EXTENSION: &str = "sty";

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
}

impl LatexCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compiles `tex_file` and returns the path of the produced PDF.
    pub fn compile(&self, tex_file: &Path, template_dir: &Path) -> Result<PathBuf, BuildError> {
        let tex_file = tex_file
            .canonicalize()
            .map_err(|e| BuildError::io(tex_file, e))?;
        let output_dir = tex_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let copied = copy_style_files(template_dir, &output_dir)?;
        debug!("Copied {copied} style file(s) to {}", output_dir.display());

        let executable = which::which(&self.program).map_err(|e| {
            warn!("Could not resolve '{}': {e}", self.program);
            self.unavailable()
        })?;
        debug!("Using LaTeX compiler at {}", executable.display());

        let output = Command::new(&executable)
            .arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(&output_dir)
            .arg(&tex_file)
            .current_dir(&output_dir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => self.unavailable(),
                _ => BuildError::io(&executable, e),
            })?;

        if !output.status.success() {
            let log = String::from_utf8_lossy(&output.stdout);
            warn!(
                "{} exited with {:?} for {}",
                self.program,
                output.status.code(),
                tex_file.display()
            );
            return Err(BuildError::CompilerFailed {
                code: output.status.code(),
                log_tail: log_tail(&log, LOG_TAIL_CHARS).to_string(),
            });
        }

        let pdf_file = tex_file.with_extension("pdf");
        info!("Compiled {}", pdf_file.display());
        Ok(pdf_file)
    }

    fn unavailable(&self) -> BuildError {
        BuildError::CompilerUnavailable {
            compiler: self.program.clone(),
        }
    }
}

impl Default for LatexCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

/// Copies every `*.sty` file in `template_dir` into `output_dir`.
/// Returns the number of files copied.
pub fn copy_style_files(template_dir: &Path, output_dir: &Path) -> Result<usize, BuildError> {
    let entries = match fs::read_dir(template_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(BuildError::io(template_dir, e)),
    };

    let mut copied = 0;
    for entry in entries {
        let path = entry.map_err(|e| BuildError::io(template_dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(STYLE_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = output_dir.join(name);
        if target == path {
            continue;
        }
        fs::copy(&path, &target).map_err(|e| BuildError::io(&target, e))?;
        copied += 1;
    }
    Ok(copied)
}

/// Last `max_chars` characters of a compiler log.
pub fn log_tail(log: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match log.char_indices().rev().nth(max_chars - 1) {
        Some((idx, _)) => &log[idx..],
        None => log,
    }
}

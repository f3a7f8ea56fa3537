//! Command-line interface for `cv-build`.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{check_raw_marker, Config};
use crate::pipeline::{self, BuildOptions, DEFAULT_VARIANT};

#[derive(Debug, Parser)]
#[command(name = "cv-build")]
#[command(version, about = "Build a CV variant from JSON data and LaTeX templates", long_about = None)]
pub struct Cli {
    /// Variant to build
    #[arg(short = 'v', long, visible_alias = "template", default_value = DEFAULT_VARIANT)]
    pub variant: String,

    /// Compile to PDF after generating
    #[arg(short, long)]
    pub compile: bool,

    /// Skip JSON schema validation
    #[arg(long)]
    pub skip_validation: bool,

    /// Data directory containing <variant>/data.json
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Templates directory containing <variant>/template.tex.j2
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Output directory; artifacts go to <output>/<variant>/
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// LaTeX compiler executable
    #[arg(long)]
    pub compiler: Option<String>,

    /// Marker introducing raw LaTeX spans, e.g. /latex{\textbf{x}}
    #[arg(long)]
    pub raw_marker: Option<String>,

    /// Log pipeline details to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Merges flags over the environment configuration.
    pub fn build_options(&self, config: &Config) -> Result<BuildOptions> {
        let mut options = BuildOptions::from_config(config, self.variant.clone());
        if let Some(data) = &self.data {
            options.data_dir = data.clone();
        }
        if let Some(templates) = &self.templates {
            options.templates_dir = templates.clone();
        }
        if let Some(output) = &self.output {
            options.output_dir = output.clone();
        }
        if let Some(compiler) = &self.compiler {
            options.compiler = compiler.clone();
        }
        if let Some(marker) = &self.raw_marker {
            options.raw_marker = marker.clone();
        }
        options.compile = self.compile;
        options.skip_validation = self.skip_validation;

        check_raw_marker(&options.raw_marker)?;
        Ok(options)
    }
}

/// Parses arguments from the process, runs the build and maps the result to
/// an exit status.
pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.rust_log, cli.verbose);

    let code = execute(&cli, &config, &mut std::io::stdout().lock());
    Ok(ExitCode::from(code))
}

/// Runs one build and returns the process exit status.
pub fn execute(cli: &Cli, config: &Config, out: &mut dyn Write) -> u8 {
    let options = match cli.build_options(config) {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid options: {e:#}");
            let _ = writeln!(out, "✗ {e:#}");
            return 1;
        }
    };
    info!("Build options: {options:?}");

    match pipeline::run(&options, out) {
        Ok(report) => {
            info!("Build finished: {}", report.tex_file.display());
            0
        }
        Err(e) => {
            error!("Build failed: {e}");
            let _ = writeln!(out, "{}", e.report());
            1
        }
    }
}

/// Structured logging to stderr; stdout is reserved for status lines.
fn init_tracing(level: &str, verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log_directive(level, verbose, rust_log);
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(crate_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// `--verbose` wins over `RUST_LOG`, which wins over the configured level.
fn log_directive(level: &str, verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return crate_directive("debug");
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => crate_directive(level),
    }
}

fn crate_directive(level: &str) -> String {
    format!("{}={level}", env!("CARGO_CRATE_NAME"))
}

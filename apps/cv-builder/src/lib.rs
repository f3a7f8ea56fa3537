//! Builds typeset CVs from JSON data.
//!
//! A run loads `<data>/<variant>/data.json`, validates it against the
//! variant's `schema.json`, renders `template.tex.j2` into a `.tex` file and
//! optionally compiles it with pdflatex.

pub mod cli;
pub mod compile;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod schema;

pub use cli::run_cli;
pub use errors::BuildError;
pub use render::filters::{filter_by_resume, format_date_range, get_responsibilities, is_included};
pub use render::latex::{latex_escape, LatexEscaper};

//! Variant rendering: loads `template.tex.j2` from a variant directory and
//! renders it with the CV data tree bound as `cv`.
//!
//! Templates use LaTeX-friendly delimiters so they do not clash with braces:
//! `<% block %>`, `<< expression >>`, `<# comment #>`. Output is never
//! auto-escaped; templates opt in per field with the `latex` filter.

pub mod filters;
pub mod latex;

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::syntax::SyntaxConfig;
use minijinja::value::Value;
use minijinja::{context, AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior};
use tracing::{debug, info};

use crate::errors::BuildError;
use crate::models::cv::DateRange;
use latex::LatexEscaper;

/// Template file every variant directory must contain.
pub const TEMPLATE_NAME: &str = "template.tex.j2";

/// Names under which the filters are exposed to templates.
pub const LATEX_FILTER: &str = "latex";
pub const DATE_RANGE_FILTER: &str = "date_range";
pub const RESUME_FILTER: &str = "resume_filter";
pub const RESPONSIBILITIES_FILTER: &str = "get_resp";

/// Builds the template environment for one variant directory.
pub fn create_environment(
    variant_dir: &Path,
    escaper: LatexEscaper,
) -> Result<Environment<'static>, BuildError> {
    let mut env = Environment::new();

    let syntax = SyntaxConfig::builder()
        .block_delimiters("<%", "%>")
        .variable_delimiters("<<", ">>")
        .comment_delimiters("<#", "#>")
        .build()
        .map_err(BuildError::Render)?;
    env.set_syntax(syntax);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_loader(minijinja::path_loader(variant_dir));

    register_filters(&mut env, escaper);
    Ok(env)
}

/// Registers the LaTeX escaper and the résumé field filters.
pub fn register_filters(env: &mut Environment<'static>, escaper: LatexEscaper) {
    env.add_filter(LATEX_FILTER, move |value: Value| latex_filter(&escaper, value));
    env.add_filter(DATE_RANGE_FILTER, date_range_filter);
    env.add_filter(RESUME_FILTER, resume_filter);
    env.add_filter(RESPONSIBILITIES_FILTER, responsibilities_filter);
}

/// Renders the variant's template to a string.
pub fn render_variant(
    env: &Environment<'_>,
    cv_data: &serde_json::Value,
) -> Result<String, BuildError> {
    let template = env.get_template(TEMPLATE_NAME).map_err(|e| match e.kind() {
        ErrorKind::TemplateNotFound => BuildError::TemplateMissing {
            name: TEMPLATE_NAME.to_string(),
        },
        _ => BuildError::Render(e),
    })?;

    template
        .render(context! { cv => cv_data })
        .map_err(BuildError::Render)
}

/// Renders a variant and writes `<output_dir>/<variant_name>.tex`.
/// Returns the path of the written file.
pub fn build_variant(
    variant_dir: &Path,
    output_dir: &Path,
    variant_name: &str,
    cv_data: &serde_json::Value,
    escaper: LatexEscaper,
) -> Result<PathBuf, BuildError> {
    let env = create_environment(variant_dir, escaper)?;
    let output = render_variant(&env, cv_data)?;
    debug!("Rendered {} bytes for variant '{variant_name}'", output.len());

    let output_file = output_dir.join(format!("{variant_name}.tex"));
    fs::write(&output_file, output).map_err(|e| BuildError::io(&output_file, e))?;

    info!("Wrote {}", output_file.display());
    Ok(output_file)
}

// ────────────────────────────────────────────────────────────────────────────
// Template filters
// ────────────────────────────────────────────────────────────────────────────

/// Strings are escaped; any other value passes through untouched.
fn latex_filter(escaper: &LatexEscaper, value: Value) -> Value {
    match value.as_str() {
        Some(text) => Value::from(escaper.escape(text)),
        None => value,
    }
}

fn date_range_filter(item: Value) -> Result<String, Error> {
    let entry = to_json(&item)?;
    Ok(DateRange::from_entry(&entry).to_string())
}

fn resume_filter(items: Value) -> Result<Value, Error> {
    match to_json(&items)? {
        serde_json::Value::Array(list) => {
            Ok(Value::from_serialize(filters::filter_by_resume(&list)))
        }
        serde_json::Value::Object(map) => {
            let kept: serde_json::Map<String, serde_json::Value> =
                filters::filter_entries_by_resume(&map)
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
            Ok(Value::from_serialize(kept))
        }
        serde_json::Value::Null => Ok(Value::from(Vec::<Value>::new())),
        _ => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("{RESUME_FILTER} expects a sequence or mapping, got {}", items.kind()),
        )),
    }
}

fn responsibilities_filter(entry: Value) -> Result<Vec<String>, Error> {
    let entry = to_json(&entry)?;
    Ok(filters::get_responsibilities(&entry))
}

fn to_json(value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            "value cannot be read as CV data",
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_env() -> Environment<'static> {
        create_environment(Path::new("."), LatexEscaper::default()).unwrap()
    }

    #[test]
    fn test_custom_delimiters() {
        let env = test_env();
        let out = env
            .render_str(
                "<# comment #><% if true %><< name >><% endif %>",
                context! { name => "Ada" },
            )
            .unwrap();
        assert_eq!(out, "Ada");
    }

    #[test]
    fn test_braces_are_plain_text() {
        let env = test_env();
        let out = env
            .render_str(r"\section{<< title >>}", context! { title => "Experience" })
            .unwrap();
        assert_eq!(out, r"\section{Experience}");
    }

    #[test]
    fn test_latex_filter_registered() {
        let env = test_env();
        let out = env.render_str("<< v | latex >>", context! { v => "&" }).unwrap();
        assert_eq!(out, r"\&");
    }

    #[test]
    fn test_latex_filter_passes_non_strings_through() {
        let env = test_env();
        let out = env
            .render_str(
                "<< n | latex >>|<< none | latex >>|<< items | latex | join(',') >>",
                context! { n => 123, none => (), items => vec!["a_b", "c"] },
            )
            .unwrap();
        assert_eq!(out, "123|none|a_b,c");
    }

    #[test]
    fn test_latex_filter_with_custom_marker() {
        let env = create_environment(Path::new("."), LatexEscaper::new("/literal")).unwrap();
        let out = env
            .render_str(
                "<< v | latex >>",
                context! { v => r"Use /literal{\textbf{bold}} text" },
            )
            .unwrap();
        assert_eq!(out, r"Use \textbf{bold} text");
    }

    #[test]
    fn test_date_range_filter_registered() {
        let env = test_env();
        let out = env
            .render_str(
                "<< a | date_range >>/<< b | date_range >>",
                context! {
                    a => json!({"startDate": "Jan 2020", "endDate": "Dec 2021"}),
                    b => json!({"startDate": "Jan 2020", "endDate": null}),
                },
            )
            .unwrap();
        assert_eq!(out, "Jan 2020 -- Dec 2021/Jan 2020");
    }

    #[test]
    fn test_resume_filter_registered() {
        let env = test_env();
        let out = env
            .render_str(
                "<< items | resume_filter | length >>",
                context! { items => json!([{"inResume": true}, {"inResume": false}]) },
            )
            .unwrap();
        assert_eq!(out, "1");
    }

    #[test]
    fn test_resume_filter_on_mapping_keeps_order() {
        let env = test_env();
        let out = env
            .render_str(
                "<% for k, v in skills | resume_filter | items %><< k >>=<< v.value >>;<% endfor %>",
                context! {
                    skills => json!({
                        "Languages": {"value": "Rust", "inResume": true},
                        "Hidden": {"value": "x", "inResume": false},
                        "Cloud": {"value": "AWS"}
                    })
                },
            )
            .unwrap();
        assert_eq!(out, "Languages=Rust;Cloud=AWS;");
    }

    #[test]
    fn test_resume_filter_on_undefined_is_empty() {
        let env = test_env();
        let out = env
            .render_str("[<% for x in missing | resume_filter %>x<% endfor %>]", context! {})
            .unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_resume_filter_rejects_scalars() {
        let env = test_env();
        let err = env
            .render_str("<< 5 | resume_filter >>", context! {})
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_get_resp_filter_registered() {
        let env = test_env();
        let out = env
            .render_str(
                "<% for r in item | get_resp %>- << r >>\n<% endfor %>",
                context! {
                    item => json!({"responsibilities": [
                        {"value": "Task", "inResume": true},
                        {"value": "Hidden", "inResume": false}
                    ]})
                },
            )
            .unwrap();
        assert_eq!(out, "- Task\n");
    }

    #[test]
    fn test_undefined_fields_render_empty() {
        let env = test_env();
        let out = env
            .render_str("[<< cv.personalInfo.linkedin.url >>]", context! { cv => json!({}) })
            .unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_template_missing() {
        let dir = tempfile::tempdir().unwrap();
        let env = create_environment(dir.path(), LatexEscaper::default()).unwrap();
        let err = render_variant(&env, &json!({})).unwrap_err();
        assert!(matches!(err, BuildError::TemplateMissing { .. }));
    }

    #[test]
    fn test_build_variant_writes_tex_file() {
        let variant = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            variant.path().join(TEMPLATE_NAME),
            "<% for exp in cv.experience | resume_filter %>\n<< exp.title | latex >> (<< exp | date_range >>)\n<% endfor %>\n",
        )
        .unwrap();

        let data = json!({"experience": [
            {"title": "R&D Engineer", "startDate": "Jan 2020", "endDate": null},
            {"title": "Intern", "startDate": "2018", "endDate": "2019", "inResume": false}
        ]});
        let path = build_variant(
            variant.path(),
            output.path(),
            "demo",
            &data,
            LatexEscaper::default(),
        )
        .unwrap();

        assert_eq!(path, output.path().join("demo.tex"));
        assert_eq!(fs::read_to_string(path).unwrap(), "R\\&D Engineer (Jan 2020)\n");
    }
}

//! JSON Schema validation of CV data before rendering.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::BuildError;

/// Path shown when the violation is on the document root itself.
const ROOT_PATH: &str = "(root)";

/// Validates `cv_data` against `schema`.
///
/// On failure the first violation is returned as
/// [`BuildError::SchemaViolation`], with its instance path rendered as
/// `section -> 0 -> field`.
pub fn validate_cv(cv_data: &Value, schema: &Value, schema_path: &Path) -> Result<(), BuildError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| BuildError::InvalidSchema {
        path: schema_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut errors = validator.iter_errors(cv_data);
    let Some(first) = errors.next() else {
        return Ok(());
    };

    let remaining = errors.count();
    if remaining > 0 {
        debug!("{remaining} further schema violation(s) not reported");
    }

    Err(BuildError::SchemaViolation {
        message: first.to_string(),
        path: display_path(&first.instance_path.to_string()),
    })
}

/// Turns a JSON pointer (`/experience/0/title`) into `experience -> 0 -> title`.
pub fn display_path(pointer: &str) -> String {
    let segments: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();

    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(" -> ")
    }
}

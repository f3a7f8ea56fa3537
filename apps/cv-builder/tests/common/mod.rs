#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Minimal CV that satisfies the bundled resume schema.
pub fn sample_cv_data() -> Value {
    json!({
        "personalInfo": {
            "name": "John Doe",
            "email": "john@example.com",
            "location": "New York, NY",
            "linkedin": {"url": "https://linkedin.com/in/johndoe", "inResume": true},
            "github": {"url": "https://github.com/johndoe", "inResume": true}
        },
        "experience": [{
            "title": "Software Engineer",
            "company": "Tech Corp",
            "location": "New York, NY",
            "startDate": "Jan 2020",
            "endDate": null,
            "description": "Building software",
            "responsibilities": [
                {"value": "Write code", "inResume": true},
                {"value": "Review PRs", "inResume": false}
            ],
            "inResume": true
        }],
        "education": [{
            "degree": "B.S. Computer Science",
            "institution": "State University",
            "location": "Boston, MA",
            "startDate": "Sep 2016",
            "endDate": "May 2020",
            "details": {},
            "inResume": true
        }],
        "licenses": [],
        "technicalSkills": {
            "Languages": {"value": "Python, JavaScript", "inResume": true}
        },
        "projects": [{
            "name": "Open Source Tool",
            "description": "A CLI tool",
            "technologies": "Python",
            "url": "https://github.com/johndoe/tool",
            "inResume": true
        }],
        "personalSkills": {
            "Leadership": {"value": "Team Leadership", "inResume": true}
        },
        "footer": {"value": "References available upon request", "inResume": false}
    })
}

/// Bare CV skeleton with every section empty, for targeted template checks.
pub fn empty_cv_with(overrides: Value) -> Value {
    let mut base = json!({
        "personalInfo": {
            "name": "John Doe",
            "email": "test@example.com",
            "location": "City",
            "linkedin": {"url": "https://linkedin.com/in/test", "inResume": true},
            "github": {"url": "https://github.com/test", "inResume": true}
        },
        "experience": [],
        "education": [],
        "licenses": [],
        "technicalSkills": {},
        "projects": [],
        "personalSkills": {},
        "footer": {"value": "", "inResume": false}
    });
    if let (Some(base_map), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base_map.insert(k.clone(), v.clone());
        }
    }
    base
}

pub fn bundled_resume_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates").join("resume")
}

pub fn bundled_resume_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("resume")
        .join("data.json")
}

/// Lays out `<root>/templates/test_template` and `<root>/data/test_template`.
pub fn write_test_variant(root: &Path, data: &Value) {
    let variant_dir = root.join("templates").join("test_template");
    fs::create_dir_all(&variant_dir).unwrap();
    fs::write(
        variant_dir.join("template.tex.j2"),
        r"<% for exp in cv.experience | resume_filter %>
<< exp.title | latex >> at << exp.company | latex >>
<< exp | date_range >>
<% for resp in exp | get_resp %>
- << resp | latex >>
<% endfor %>
<% endfor %>
",
    )
    .unwrap();
    fs::write(variant_dir.join("test_template.sty"), "% Test style file\n").unwrap();
    fs::write(
        variant_dir.join("schema.json"),
        serde_json::to_string_pretty(&json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "required": ["personalInfo", "experience"],
            "additionalProperties": true,
            "properties": {
                "personalInfo": {"type": "object"},
                "experience": {"type": "array"}
            }
        }))
        .unwrap(),
    )
    .unwrap();

    let data_dir = root.join("data").join("test_template");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("data.json"), data.to_string()).unwrap();
}

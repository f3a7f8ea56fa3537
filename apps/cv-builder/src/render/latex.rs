//! LaTeX escaping with raw passthrough spans.
//!
//! Text is escaped through a fixed replacement table, except for spans written
//! as `<marker>{...}` (default marker `/latex`) whose body is copied verbatim.
//! A body may hold one level of balanced braces, enough for `\href{url}{text}`.
//!
//! Spans are extracted before anything is escaped: escaping first would
//! rewrite the braces that delimit the span. The text is split into typed
//! segments, so a raw body can never be confused with ordinary input the way a
//! sentinel placeholder string could.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Marker used by the bundled templates and data files.
pub const DEFAULT_RAW_MARKER: &str = "/latex";

/// Reserved LaTeX characters and their escaped forms. Applied once per char,
/// so the braces inside `\textasciitilde{}` are never re-escaped.
const REPLACEMENTS: &[(char, &str)] = &[
    ('&', r"\&"),
    ('%', r"\%"),
    ('$', r"\$"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Raw(&'a str),
}

/// Escaper bound to one raw passthrough marker.
#[derive(Debug, Clone)]
pub struct LatexEscaper {
    marker: String,
    span: Regex,
}

impl LatexEscaper {
    pub fn new(marker: &str) -> Self {
        // <marker>{ (non-brace | {non-brace*})* }
        let pattern = format!(
            r"{}\{{((?:[^{{}}]|\{{[^{{}}]*\}})*)\}}",
            regex::escape(marker)
        );
        Self {
            marker: marker.to_string(),
            span: Regex::new(&pattern).expect("raw span pattern is valid for any escaped marker"),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Escapes `text`, copying the body of every well-formed raw span unchanged.
    ///
    /// Malformed spans (no closing brace, nesting deeper than one level) are
    /// ordinary text and get escaped like everything else.
    pub fn escape(&self, text: &str) -> String {
        if !text.contains(self.marker.as_str()) {
            return escape_reserved(text).into_owned();
        }

        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for segment in self.segments(text) {
            match segment {
                Segment::Text(s) => out.push_str(&escape_reserved(s)),
                Segment::Raw(body) => out.push_str(body),
            }
        }
        out
    }

    /// Splits `text` into escaped and raw parts in one left-to-right pass.
    fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in self.span.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Text(&text[last..whole.start()]));
            }
            segments.push(Segment::Raw(body.as_str()));
            last = whole.end();
        }

        if last < text.len() {
            segments.push(Segment::Text(&text[last..]));
        }
        segments
    }
}

impl Default for LatexEscaper {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_MARKER)
    }
}

/// Escapes `text` with the default `/latex` marker.
pub fn latex_escape(text: &str) -> String {
    static DEFAULT: OnceLock<LatexEscaper> = OnceLock::new();
    DEFAULT.get_or_init(LatexEscaper::default).escape(text)
}

/// Applies the replacement table without any raw span handling.
pub fn escape_reserved(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_reserved) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match REPLACEMENTS.iter().find(|(reserved, _)| *reserved == c) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_reserved(c: char) -> bool {
    REPLACEMENTS.iter().any(|(reserved, _)| *reserved == c)
}

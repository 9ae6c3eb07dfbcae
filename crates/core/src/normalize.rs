//! Rewrites raw struct-tag validator messages into user-facing text.
//!
//! Rules are matched by substring, in order, first match wins. New raw
//! patterns are appended to [`RULES`]; existing entries keep their position
//! because one raw message can contain more than one needle.

use std::sync::LazyLock;

use regex::Regex;

/// Bounds embedded in a length rule message, e.g. `length(3|20)`.
static LENGTH_BOUNDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+)\|([0-9]+)\)").expect("valid regex"));

/// Produces the rewritten message, or `None` to keep the raw one.
type Rewrite = fn(raw: &str, attr: &str) -> Option<String>;

const RULES: &[(&str, Rewrite)] = &[
    ("non zero value required", blank),
    ("as length", wrong_length),
    ("as numeric", not_a_number),
    ("as email", not_an_email),
];

fn blank(_raw: &str, attr: &str) -> Option<String> {
    Some(format!("{attr} can't be blank"))
}

fn wrong_length(raw: &str, attr: &str) -> Option<String> {
    let Some(caps) = LENGTH_BOUNDS_RE.captures(raw) else {
        tracing::warn!(attribute = attr, raw = raw, "Length rule message without bounds");
        return None;
    };
    Some(format!(
        "{attr} is the wrong length (should be {}~{} characters)",
        &caps[1], &caps[2]
    ))
}

fn not_a_number(_raw: &str, attr: &str) -> Option<String> {
    Some(format!("{attr} is not a number"))
}

fn not_an_email(_raw: &str, attr: &str) -> Option<String> {
    Some(format!("{attr} is not a valid email address"))
}

/// Normalize a raw validator message for attribute `attr`.
///
/// Messages matching no rule, and length messages whose bounds cannot be
/// parsed, are returned unchanged.
pub fn normalize_message(raw: &str, attr: &str) -> String {
    RULES
        .iter()
        .find(|(needle, _)| raw.contains(*needle))
        .and_then(|(_, rewrite)| rewrite(raw, attr))
        .unwrap_or_else(|| raw.to_string())
}

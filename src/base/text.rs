//! Text helpers shared by the parser, the serializer and the property setters.

/// Characters that may never appear in a page target name.
const ILLEGAL_TARGET_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Normalise a free-text property value.
///
/// Line breaks are removed (the fragments are joined), trailing whitespace is
/// trimmed and leading whitespace is kept. Empty or whitespace-only input
/// yields `None`.
pub fn clean_text(value: &str) -> Option<String> {
    let joined: String = value.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    let trimmed = joined.trim_end();
    if trimmed.trim_start().is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_illegal_target_char(c: char) -> bool {
    c.is_whitespace() || c.is_control() || ILLEGAL_TARGET_CHARS.contains(&c)
}

/// Check whether `name` can be used as a page target name.
pub fn is_legal_target_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(is_illegal_target_char)
}

/// Rewrite `name` into a legal target name.
///
/// Each run of illegal characters collapses into a single `_`; an empty result
/// becomes `untitled`.
pub fn legalize_target_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.trim().chars() {
        if is_illegal_target_char(c) {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    if out.is_empty() || out.chars().all(|c| c == '_') {
        "untitled".to_string()
    } else {
        out
    }
}

/// Lower-cased key used for case-insensitive page lookups.
pub fn target_key(name: &str) -> String {
    name.trim().replace('/', "\\").to_ascii_lowercase()
}

/// Format a coordinate the way LDraw files write them: at most six decimal
/// places, no trailing zeros, no negative zero.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Append `values` separated by single spaces.
pub fn push_numbers(out: &mut String, values: &[f64]) {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format_number(*v));
    }
}

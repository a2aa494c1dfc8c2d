#![allow(dead_code)]

pub mod library;
pub mod source_fixtures;

use ldraw::{Document, Parser};

/// Parse `text` as `name` with default options.
pub fn parse(text: &str, name: &str) -> Document {
    Parser::default()
        .parse_str(text, name)
        .unwrap()
        .loaded()
        .unwrap()
        .document
}

/// Join `lines` with CR+LF terminators.
pub fn crlf(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\r\n")).collect()
}

#![allow(clippy::unwrap_used, clippy::expect_used)]


use super::*;
use crate::base::NodeId;
use crate::dom::{Document, ElementKind, Page};
use crate::parser::Parser;

/// Join `lines` with CR+LF terminators.
pub(super) fn crlf(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\r\n")).collect()
}

pub(super) fn parse(text: &str, name: &str) -> Document {
    Parser::default()
        .parse_str(text, name)
        .unwrap()
        .loaded()
        .unwrap()
        .document
}

/// A one-step page holding `kinds`, returned with the step id.
pub(super) fn step_with(kinds: Vec<ElementKind>) -> (Document, NodeId) {
    let mut doc = Document::new();
    let page = doc.create_page(Page::new("model.ldr")).unwrap();
    doc.add(doc.root(), page).unwrap();
    let step = doc.create_step().unwrap();
    doc.add(page, step).unwrap();
    for kind in kinds {
        let id = doc.create_element(kind).unwrap();
        doc.add(step, id).unwrap();
    }
    (doc, step)
}

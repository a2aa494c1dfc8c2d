#![allow(clippy::unwrap_used, clippy::expect_used)]


use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::*;
use crate::base::NodeId;
use crate::base::text::target_key;
use crate::core::Error;
use crate::dom::{ElementKind, LibraryPage, Redirect};

pub(super) fn load(text: &str) -> ParsedDocument {
    load_with(text, ParseOptions::default())
}

pub(super) fn load_with(text: &str, options: ParseOptions) -> ParsedDocument {
    Parser::new(options)
        .parse_str(text, "model.ldr")
        .unwrap()
        .loaded()
        .expect("not cancelled")
}

pub(super) fn load_err(text: &str) -> Error {
    Parser::default().parse_str(text, "model.ldr").unwrap_err()
}

/// Element kinds of a page, in document order.
pub(super) fn kinds(doc: &Document, page: NodeId) -> Vec<ElementKind> {
    doc.elements(page)
        .into_iter()
        .map(|id| doc.kind(id).unwrap().clone())
        .collect()
}

pub(super) fn first_page(doc: &Document) -> NodeId {
    doc.pages()[0]
}

/// The element of the first page whose index in [`kinds`] is `index`.
pub(super) fn element_at(doc: &Document, index: usize) -> NodeId {
    doc.elements(first_page(doc))[index]
}

pub(super) fn target_of(doc: &Document, index: usize) -> String {
    match doc.kind(element_at(doc, index)).unwrap() {
        ElementKind::Reference(r) => r.target_name().to_string(),
        other => panic!("expected a reference, got {other:?}"),
    }
}

/// A parts library held in one parsed document, plus an x-series table.
pub(super) struct Library {
    document: Rc<Document>,
    renumbered: FxHashMap<String, Redirect>,
}

impl Library {
    pub fn new(mpd: &str) -> Self {
        let options = ParseOptions::default().with_circular_reference_check(false);
        let parsed = Parser::new(options)
            .parse_str(mpd, "library.mpd")
            .unwrap()
            .loaded()
            .unwrap();
        Self {
            document: Rc::new(parsed.document),
            renumbered: FxHashMap::default(),
        }
    }

    pub fn with_x_series(mut self, old: &str, redirect: Redirect) -> Self {
        self.renumbered.insert(target_key(old), redirect);
        self
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }
}

impl PageResolver for Library {
    fn resolve(&self, name: &str) -> Option<LibraryPage> {
        self.document.page_by_name(name).map(|page| LibraryPage {
            document: Rc::clone(&self.document),
            page,
        })
    }

    fn x_series_redirect(&self, name: &str) -> Option<Redirect> {
        self.renumbered.get(&target_key(name)).cloned()
    }
}

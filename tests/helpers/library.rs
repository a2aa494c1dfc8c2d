//! A parts library backed by a parsed multi-page document.

use std::rc::Rc;

use ldraw::dom::{LibraryPage, Redirect};
use ldraw::{Document, PageResolver, ParseOptions, Parser};
use rustc_hash::FxHashMap;

pub struct Library {
    document: Rc<Document>,
    renumbered: FxHashMap<String, Redirect>,
}

impl Library {
    pub fn new(mpd: &str) -> Self {
        let document = Parser::new(ParseOptions::default().with_circular_reference_check(false))
            .parse_str(mpd, "library.mpd")
            .unwrap()
            .loaded()
            .unwrap()
            .document;
        Self {
            document: Rc::new(document),
            renumbered: FxHashMap::default(),
        }
    }

    /// Add an x-series renumbering entry.
    pub fn with_x_series(mut self, old: &str, redirect: Redirect) -> Self {
        self.renumbered.insert(old.to_ascii_lowercase(), redirect);
        self
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
        self.renumbered.get(&name.to_ascii_lowercase()).cloned()
    }
}

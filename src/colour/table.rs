//! Colour tables: code → entry maps with a frozen flag.

use indexmap::IndexMap;

use super::ColourEntry;
use crate::core::{Error, Result, Subject};

/// An ordered mapping from colour code to [`ColourEntry`].
///
/// Insertion order is preserved so a table loaded from an LDConfig file
/// serializes back in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColourTable {
    entries: IndexMap<u32, ColourEntry>,
    frozen: bool,
}

impl ColourTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: u32) -> Option<&ColourEntry> {
        self.entries.get(&code)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColourEntry> {
        self.entries.values()
    }

    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Add or replace the entry for its code. Returns the replaced entry.
    pub fn insert(&mut self, entry: ColourEntry) -> Result<Option<ColourEntry>> {
        if self.frozen {
            return Err(Error::Frozen(Subject::Colour(entry.code())));
        }
        Ok(self.entries.insert(entry.code(), entry))
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze the table and every entry in it.
    pub fn freeze(&mut self) {
        for entry in self.entries.values_mut() {
            entry.freeze();
        }
        self.frozen = true;
    }

    /// Freeze only the table itself; entries keep their own state.
    pub(crate) fn seal(&mut self) {
        self.frozen = true;
    }

    /// Find an entry by name, case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&ColourEntry> {
        self.entries
            .values()
            .find(|entry| entry.name().eq_ignore_ascii_case(name))
    }
}

//! Colour tables visible at a point in the tree.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::Document;
use super::element::ElementKind;
use super::node::{Node, NodeKind};
use crate::base::NodeId;
use crate::colour::{ColourEntry, ColourTable, Palette};
use crate::core::Result;

impl Document {
    /// The colours visible at `id`: the global palette shadowed by the
    /// `!COLOUR` definitions that precede it.
    pub fn colour_table(&self, id: NodeId) -> Result<Arc<ColourTable>> {
        self.colour_table_with(id, &Palette::global().table())
    }

    /// Like [`Document::colour_table`], over an explicit base table.
    ///
    /// Without local definitions the base itself is returned. Otherwise the
    /// result is a new frozen table whose override entries are frozen too.
    pub fn colour_table_with(&self, id: NodeId, base: &Arc<ColourTable>) -> Result<Arc<ColourTable>> {
        let overrides = self.visible_definitions(id)?;
        if overrides.is_empty() {
            return Ok(Arc::clone(base));
        }
        let mut table = ColourTable::new();
        for entry in base.iter() {
            table.insert(entry.clone())?;
        }
        for mut entry in overrides {
            entry.freeze();
            table.insert(entry)?;
        }
        table.seal();
        Ok(Arc::new(table))
    }

    /// Definitions preceding `id`, nearest first, one per code.
    fn visible_definitions(&self, id: NodeId) -> Result<Vec<ColourEntry>> {
        let node = self.node(id)?;
        // Texmap children see what their texmap sees.
        let (anchor, step) = match (&node.kind, node.parent) {
            (NodeKind::Element(_), Some(parent)) => match self.node(parent)?.kind {
                NodeKind::Step => (Some(id), Some(parent)),
                NodeKind::Element(_) => (Some(parent), self.node(parent)?.parent),
                _ => (None, None),
            },
            (NodeKind::Step, _) => (None, Some(id)),
            _ => (None, None),
        };
        let Some(step) = step else {
            return Ok(Vec::new());
        };

        let mut seen = FxHashSet::default();
        let mut found = Vec::new();
        let mut collect = |doc: &Document, elements: &[NodeId]| {
            for element in elements.iter().rev() {
                if let Some(ElementKind::Colour(entry)) =
                    doc.nodes.get(*element).and_then(Node::element).map(|e| &e.kind)
                {
                    if seen.insert(entry.code()) {
                        found.push(entry.clone());
                    }
                }
            }
        };

        let siblings = self.children(step)?;
        let before: &[NodeId] = match anchor {
            Some(anchor) => siblings
                .iter()
                .position(|s| *s == anchor)
                .map_or(siblings, |i| &siblings[..i]),
            None => &[],
        };
        collect(self, before);

        if let Some(page) = self.node(step)?.parent {
            let steps = self.children(page)?;
            let index = steps.iter().position(|s| *s == step).unwrap_or(0);
            for previous in steps[..index].iter().rev() {
                collect(self, self.children(*previous)?);
            }
        }
        Ok(found)
    }
}

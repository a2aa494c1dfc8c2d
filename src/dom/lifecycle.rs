//! Disposal, freezing, locking and the mutation gate.

use tracing::debug;

use super::Document;
use super::element::ElementKind;
use super::node::NodeKind;
use crate::base::NodeId;
use crate::core::{Error, NodeEvent, Property, PropertyValue, Result, Subject};

impl Document {
    /// True if `id` or any of its ancestors is frozen.
    pub fn is_frozen(&self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        Ok(node.frozen
            || self
                .ancestors(id)
                .any(|a| self.nodes.get(a).is_some_and(|n| n.frozen)))
    }

    pub fn is_locked(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.locked)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Check the gates every mutation passes, in order: disposed, frozen,
    /// locked, read-only.
    pub fn check_mutable(&self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        if self.is_frozen(id)? {
            return Err(Error::Frozen(Subject::Node(id)));
        }
        if node.locked {
            return Err(Error::Locked(Subject::Node(id)));
        }
        if self.read_only {
            return Err(Error::ReadOnly(id));
        }
        Ok(())
    }

    pub fn set_read_only(&mut self, read_only: bool) -> Result<()> {
        let root = self.root();
        let node = self.node(root)?;
        if node.frozen {
            return Err(Error::Frozen(Subject::Node(root)));
        }
        if self.read_only == read_only {
            return Ok(());
        }
        self.read_only = read_only;
        self.emit(
            root,
            NodeEvent::Changed {
                node: root,
                property: Property::ReadOnly,
                old: PropertyValue::Bool(!read_only),
                new: PropertyValue::Bool(read_only),
            },
        );
        Ok(())
    }

    /// Lock `id` against mutation until [`Document::unlock`].
    pub fn lock(&mut self, id: NodeId) -> Result<()> {
        self.set_locked(id, true)
    }

    pub fn unlock(&mut self, id: NodeId) -> Result<()> {
        self.set_locked(id, false)
    }

    fn set_locked(&mut self, id: NodeId, locked: bool) -> Result<()> {
        if self.is_frozen(id)? {
            return Err(Error::Frozen(Subject::Node(id)));
        }
        let node = self.node_mut(id)?;
        if node.locked == locked {
            return Ok(());
        }
        node.locked = locked;
        self.emit(
            id,
            NodeEvent::Changed {
                node: id,
                property: Property::Locked,
                old: PropertyValue::Bool(!locked),
                new: PropertyValue::Bool(locked),
            },
        );
        Ok(())
    }

    /// Freeze `id` and everything below it. Freezing cannot be undone.
    pub fn freeze(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.frozen {
            return Ok(());
        }
        self.emit(id, NodeEvent::Freezing { node: id });
        let children = self.node(id)?.children.clone();
        for child in children {
            self.freeze(child)?;
        }
        let node = self.node_mut(id)?;
        node.frozen = true;
        if let Some(ElementKind::Colour(entry)) = node.element_mut().map(|e| &mut e.kind) {
            entry.freeze();
        }
        self.emit(id, NodeEvent::Frozen { node: id });
        Ok(())
    }

    /// Dispose `id` and its subtree.
    ///
    /// Disposing an already disposed node is an error, as is disposing a
    /// frozen node. Disposing the root disposes the whole document.
    pub fn dispose(&mut self, id: NodeId) -> Result<()> {
        if self.is_frozen(id)? {
            return Err(Error::Frozen(Subject::Node(id)));
        }
        let parent = self.node(id)?.parent;
        self.dispose_subtree(id);

        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.retain(|c| *c != id);
                node.unlisten(id);
            }
            self.modified = true;
            self.emit(
                parent,
                NodeEvent::ItemsRemoved {
                    container: parent,
                    items: vec![id],
                },
            );
        }

        if id == self.root() {
            // Detached nodes die with their document.
            self.nodes.clear();
            debug!("document disposed");
        }
        Ok(())
    }

    fn dispose_subtree(&mut self, id: NodeId) {
        self.emit(id, NodeEvent::Disposing { node: id });
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.dispose_subtree(child);
        }

        self.leave_group_unchecked(id);
        let members = match self.nodes.get(id).map(|node| &node.kind) {
            Some(NodeKind::Element(element)) => match &element.kind {
                ElementKind::Group(group) => group.members.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        for member in members {
            self.leave_group_unchecked(member);
        }
        self.nodes.remove(id);
    }
}

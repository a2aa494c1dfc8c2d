//! Containment, path propagation and grouping.
//!
//! A node has at most one structural parent. Attaching a child registers it as
//! a path listener of its container (twice for groupable elements: once to
//! forward the notification, once to re-check group membership), and a group
//! member is a path listener of its group. Whenever a node moves, the move is
//! propagated through these listeners and stale group memberships are dropped.

use tracing::debug;

use super::Document;
use super::element::{ElementKind, TexmapSection};
use super::node::{Node, NodeKind, PathLink, PathListener};
use crate::base::NodeId;
use crate::base::text::target_key;
use crate::core::{Error, NodeEvent, Property, PropertyValue, Result, Subject};

impl Document {
    // ========================================================================
    // Containers
    // ========================================================================

    /// Append `child` to `container`.
    pub fn add(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        let len = self.children(container)?.len();
        self.insert(container, len, child)
    }

    /// Insert `child` into `container` at `index`.
    pub fn insert(&mut self, container: NodeId, index: usize, child: NodeId) -> Result<()> {
        let section = self.is_texmap(container).then_some(TexmapSection::Shared);
        self.insert_in_section(container, index, child, section)
    }

    /// Append `child` to a texmap block in the given section.
    ///
    /// Fallback children always follow the others.
    pub fn add_to_texmap(&mut self, texmap: NodeId, section: TexmapSection, child: NodeId) -> Result<()> {
        if !self.is_texmap(texmap) {
            self.check_mutable(texmap)?;
            return Err(Error::invalid(format!("{texmap} is not a texmap")));
        }
        let children = self.children(texmap)?;
        let index = match section {
            TexmapSection::Fallback => children.len(),
            _ => children
                .iter()
                .position(|c| self.texmap_section(*c) == Some(TexmapSection::Fallback))
                .unwrap_or(children.len()),
        };
        self.insert_in_section(texmap, index, child, Some(section))
    }

    /// The texmap section of a texmap child.
    pub fn texmap_section(&self, id: NodeId) -> Option<TexmapSection> {
        self.nodes.get(id)?.element()?.section
    }

    fn is_texmap(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .and_then(Node::element)
            .is_some_and(|e| matches!(e.kind, ElementKind::Texmap(_)))
    }

    fn insert_in_section(
        &mut self,
        container: NodeId,
        index: usize,
        child: NodeId,
        section: Option<TexmapSection>,
    ) -> Result<()> {
        self.check_mutable(container)?;
        let child_node = self.node(child)?;
        if child_node.parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if child_node.frozen {
            return Err(Error::Frozen(Subject::Node(child)));
        }
        self.check_containment(container, child)?;
        let len = self.children(container)?.len();
        if index > len {
            return Err(Error::invalid(format!("index {index} out of range 0..={len}")));
        }
        self.attach(container, index, child, section);
        Ok(())
    }

    fn check_containment(&self, container: NodeId, child: NodeId) -> Result<()> {
        let allowed = match (&self.node(container)?.kind, &self.node(child)?.kind) {
            (NodeKind::Document, NodeKind::Page(page)) => {
                let key = target_key(page.target_name());
                if self
                    .pages()
                    .iter()
                    .filter_map(|p| self.nodes.get(*p).and_then(Node::page))
                    .any(|other| target_key(other.target_name()) == key)
                {
                    return Err(Error::invalid(format!(
                        "a page named '{}' already exists",
                        page.target_name()
                    )));
                }
                true
            }
            (NodeKind::Page(_), NodeKind::Step) | (NodeKind::Step, NodeKind::Element(_)) => true,
            (NodeKind::Element(outer), NodeKind::Element(inner)) if matches!(outer.kind, ElementKind::Texmap(_)) => {
                if inner.is_top_level_element() {
                    return Err(Error::invalid(format!(
                        "a {} cannot be placed inside a texmap",
                        inner.kind.type_name()
                    )));
                }
                true
            }
            _ => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::invalid(format!("{container} cannot contain {child}")))
        }
    }

    fn attach(&mut self, container: NodeId, index: usize, child: NodeId, section: Option<TexmapSection>) {
        let mut groupable = false;
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(container);
            if let Some(element) = node.element_mut() {
                element.section = section;
                groupable = element.is_groupable();
            }
        }
        if let Some(node) = self.nodes.get_mut(container) {
            node.children.insert(index, child);
            node.path_listeners.push(PathListener {
                subscriber: child,
                link: PathLink::Structural,
            });
            if groupable {
                node.path_listeners.push(PathListener {
                    subscriber: child,
                    link: PathLink::Grouping,
                });
            }
        }
        self.modified = true;
        self.emit(
            container,
            NodeEvent::ItemsAdded {
                container,
                items: vec![child],
            },
        );
        self.path_changed(child);
    }

    fn detach(&mut self, container: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(container) {
            node.children.retain(|c| *c != child);
            node.unlisten(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
            if let Some(element) = node.element_mut() {
                element.section = None;
            }
        }
        self.modified = true;
    }

    /// Remove `child` from `container`. Returns false if it was not there.
    pub fn remove(&mut self, container: NodeId, child: NodeId) -> Result<bool> {
        self.check_mutable(container)?;
        if self.index_of(container, child)?.is_none() {
            return Ok(false);
        }
        if self.node(child)?.frozen {
            return Err(Error::Frozen(Subject::Node(child)));
        }
        self.detach(container, child);
        self.emit(
            container,
            NodeEvent::ItemsRemoved {
                container,
                items: vec![child],
            },
        );
        self.path_changed(child);
        Ok(true)
    }

    /// Remove and return the child at `index`.
    pub fn remove_at(&mut self, container: NodeId, index: usize) -> Result<NodeId> {
        self.check_mutable(container)?;
        let child = self
            .children(container)?
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid(format!("index {index} out of range")))?;
        self.remove(container, child)?;
        Ok(child)
    }

    /// Detach every child of `container`. Returns how many were removed.
    pub fn clear(&mut self, container: NodeId) -> Result<usize> {
        self.check_mutable(container)?;
        let children = self.children(container)?.to_vec();
        if let Some(frozen) = children
            .iter()
            .find(|c| self.nodes.get(**c).is_some_and(|n| n.frozen))
        {
            return Err(Error::Frozen(Subject::Node(*frozen)));
        }
        for child in &children {
            self.detach(container, *child);
        }
        self.emit(
            container,
            NodeEvent::ItemsCleared {
                container,
                count: children.len(),
            },
        );
        for child in &children {
            self.path_changed(*child);
        }
        Ok(children.len())
    }

    fn path_changed(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let listeners = node.path_listeners.clone();
        self.emit(id, NodeEvent::PathChanged { node: id });
        self.revalidate_group(id);
        for listener in listeners {
            match listener.link {
                PathLink::Structural => self.path_changed(listener.subscriber),
                PathLink::Grouping => self.revalidate_group(listener.subscriber),
            }
        }
    }

    // ========================================================================
    // Groups
    // ========================================================================

    pub fn group_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element(id)?.group)
    }

    pub fn group_members(&self, group: NodeId) -> Result<&[NodeId]> {
        match self.kind(group)? {
            ElementKind::Group(g) => Ok(&g.members),
            other => Err(Error::invalid(format!("a {} is not a group", other.type_name()))),
        }
    }

    /// Find a group declared in `page` by name.
    pub fn find_group(&self, page: NodeId, name: &str) -> Option<NodeId> {
        self.elements(page).into_iter().find(|id| {
            matches!(self.kind(*id), Ok(ElementKind::Group(g)) if g.name == name)
        })
    }

    /// Make `element` a member of `group`, leaving its previous group.
    pub fn join_group(&mut self, element: NodeId, group: NodeId) -> Result<()> {
        self.check_mutable(element)?;
        self.check_mutable(group)?;
        if !matches!(self.kind(group)?, ElementKind::Group(_)) {
            return Err(Error::invalid(format!("{group} is not a group")));
        }
        let kind = self.kind(element)?;
        if !kind.is_groupable() {
            return Err(Error::invalid(format!("a {} cannot join a group", kind.type_name())));
        }
        let page = self.page_of(element);
        if page.is_none() || page != self.page_of(group) {
            return Err(Error::invalid("element and group must belong to the same page"));
        }
        // A group may not end up containing itself.
        let mut current = Some(group);
        while let Some(g) = current {
            if g == element {
                return Err(Error::invalid(format!("{element} cannot join its own member")));
            }
            current = self.nodes.get(g).and_then(Node::element).and_then(|e| e.group);
        }

        let old = self.element(element)?.group;
        if old == Some(group) {
            return Ok(());
        }
        if let Some(old_group) = old {
            self.check_mutable(old_group)?;
            self.leave_group_unchecked(element);
        }

        if let Some(node) = self.nodes.get_mut(element).and_then(Node::element_mut) {
            node.group = Some(group);
        }
        if let Some(node) = self.nodes.get_mut(group) {
            node.path_listeners.push(PathListener {
                subscriber: element,
                link: PathLink::Grouping,
            });
            if let Some(ElementKind::Group(g)) = node.element_mut().map(|e| &mut e.kind) {
                g.members.push(element);
            }
        }
        self.modified = true;
        self.emit(
            element,
            NodeEvent::Changed {
                node: element,
                property: Property::Group,
                old: PropertyValue::None,
                new: PropertyValue::Node(group),
            },
        );
        self.emit(
            group,
            NodeEvent::ItemsAdded {
                container: group,
                items: vec![element],
            },
        );
        Ok(())
    }

    /// Remove `element` from its group. Returns false if it had none.
    pub fn leave_group(&mut self, element: NodeId) -> Result<bool> {
        self.check_mutable(element)?;
        let Some(group) = self.element(element)?.group else {
            return Ok(false);
        };
        self.check_mutable(group)?;
        self.leave_group_unchecked(element);
        Ok(true)
    }

    pub(crate) fn leave_group_unchecked(&mut self, element: NodeId) {
        let Some(group) = self
            .nodes
            .get_mut(element)
            .and_then(Node::element_mut)
            .and_then(|e| e.group.take())
        else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(group) {
            node.unlisten(element);
            if let Some(ElementKind::Group(g)) = node.element_mut().map(|e| &mut e.kind) {
                g.members.retain(|m| *m != element);
            }
        }
        self.modified = true;
        self.emit(
            element,
            NodeEvent::Changed {
                node: element,
                property: Property::Group,
                old: PropertyValue::Node(group),
                new: PropertyValue::None,
            },
        );
        self.emit(
            group,
            NodeEvent::ItemsRemoved {
                container: group,
                items: vec![element],
            },
        );
    }

    fn revalidate_group(&mut self, id: NodeId) {
        let Some(group) = self.nodes.get(id).and_then(Node::element).and_then(|e| e.group) else {
            return;
        };
        let page = self.page_of(id);
        if page.is_none() || page != self.page_of(group) {
            debug!(element = %id, group = %group, "element moved away from its group");
            self.leave_group_unchecked(id);
        }
    }
}

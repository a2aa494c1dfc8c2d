//! The document: arena owner and root of the tree.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::trace;

use super::element::{Element, ElementKind};
use super::node::{Node, NodeKind, NodeType};
use super::page::Page;
use crate::base::{Arena, NodeId};
use crate::core::{Error, NodeEvent, Result, SubscriptionId};

/// An LDraw document.
///
/// All nodes (pages, steps, elements) live in the document's arena and are
/// addressed by [`NodeId`]. The root node stands for the document itself and
/// holds the pages; the first page is the primary one.
#[derive(Debug)]
pub struct Document {
    pub(crate) nodes: Arena<Node>,
    root: NodeId,
    source_path: Option<PathBuf>,
    pub(crate) modified: bool,
    pub(crate) read_only: bool,
    multi_page: bool,
    next_subscription: u64,
    delivering: Vec<NodeId>,
    /// Events raised on a node while its own listeners were running.
    queued: Vec<(NodeId, NodeEvent)>,
    cancelled: FxHashSet<SubscriptionId>,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::new(NodeKind::Document));
        Self {
            nodes,
            root,
            source_path: None,
            modified: false,
            read_only: false,
            multi_page: false,
            next_subscription: 1,
            delivering: Vec::new(),
            queued: Vec::new(),
            cancelled: FxHashSet::default(),
        }
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// The root node, standing for the document itself.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        self.source_path = Some(path.into());
    }

    /// File name of the source path, or `untitled.ldr`.
    pub fn source_name(&self) -> String {
        self.source_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "untitled.ldr".to_string(), |name| name.to_string_lossy().into_owned())
    }

    /// True once the document was changed after loading.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// True if pages are written with `0 FILE` markers.
    pub fn is_multi_page(&self) -> bool {
        self.multi_page || self.pages().len() > 1
    }

    pub fn set_multi_page(&mut self, multi_page: bool) {
        self.multi_page = multi_page;
    }

    /// True until the document root is disposed.
    pub fn is_alive(&self) -> bool {
        self.nodes.contains(self.root)
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::Disposed(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::Disposed(id))
    }

    /// True if `id` names a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn node_type(&self, id: NodeId) -> Result<NodeType> {
        Ok(self.node(id)?.kind.node_type())
    }

    pub fn pages(&self) -> &[NodeId] {
        self.nodes
            .get(self.root)
            .map_or(&[], |node| node.children.as_slice())
    }

    pub fn page(&self, id: NodeId) -> Result<&Page> {
        self.node(id)?
            .page()
            .ok_or_else(|| Error::invalid(format!("{id} is not a page")))
    }

    pub fn element(&self, id: NodeId) -> Result<&Element> {
        self.node(id)?
            .element()
            .ok_or_else(|| Error::invalid(format!("{id} is not an element")))
    }

    pub fn kind(&self, id: NodeId) -> Result<&ElementKind> {
        Ok(&self.element(id)?.kind)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Position of `child` in `container`.
    pub fn index_of(&self, container: NodeId, child: NodeId) -> Result<Option<usize>> {
        Ok(self.children(container)?.iter().position(|c| *c == child))
    }

    /// Containers between `id` and the root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes.get(id).and_then(|node| node.parent), |current| {
            self.nodes.get(*current).and_then(|node| node.parent)
        })
    }

    /// The page `id` belongs to (a page is its own page).
    pub fn page_of(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| matches!(self.nodes.get(*n).map(|node| &node.kind), Some(NodeKind::Page(_))))
    }

    /// The step `id` belongs to, looking through texmaps.
    pub fn step_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|n| matches!(self.nodes.get(*n).map(|node| &node.kind), Some(NodeKind::Step)))
    }

    /// All descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(id)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Every element below `id` (texmap children included), in document order.
    pub fn elements(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.nodes.get(*n).is_some_and(|node| node.element().is_some()))
            .collect()
    }

    // ========================================================================
    // Creation
    // ========================================================================

    fn create(&mut self, kind: NodeKind) -> Result<NodeId> {
        if !self.is_alive() {
            return Err(Error::Disposed(self.root));
        }
        Ok(self.nodes.insert(Node::new(kind)))
    }

    /// Create a detached page; attach it with [`Document::add`].
    pub fn create_page(&mut self, page: Page) -> Result<NodeId> {
        self.create(NodeKind::Page(page))
    }

    pub fn create_step(&mut self) -> Result<NodeId> {
        self.create(NodeKind::Step)
    }

    pub fn create_element(&mut self, kind: ElementKind) -> Result<NodeId> {
        self.create(NodeKind::Element(Element::new(kind)))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register `listener` for events raised on `id`.
    pub fn subscribe(
        &mut self,
        id: NodeId,
        listener: impl FnMut(&NodeEvent, &mut Document) + 'static,
    ) -> Result<SubscriptionId> {
        let subscription = SubscriptionId(self.next_subscription);
        self.node_mut(id)?.events.subscribe(subscription, Box::new(listener));
        self.next_subscription += 1;
        Ok(subscription)
    }

    pub fn unsubscribe(&mut self, id: NodeId, subscription: SubscriptionId) -> Result<bool> {
        if self.node_mut(id)?.events.unsubscribe(subscription) {
            return Ok(true);
        }
        // The listener list is out for delivery; drop it when it comes back.
        if self.delivering.contains(&id) && subscription.0 < self.next_subscription {
            return Ok(self.cancelled.insert(subscription));
        }
        Ok(false)
    }

    /// Number of event listeners on `id`.
    pub fn subscriber_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.events.len())
    }

    /// Number of path-changed listeners registered on `id`.
    pub fn path_subscriber_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.path_listeners.len())
    }

    /// Deliver `event` to the listeners of `id`.
    ///
    /// An event raised on `id` by one of its own listeners is queued and
    /// delivered once the current delivery finishes, to the listener list as
    /// it stands then.
    pub(crate) fn emit(&mut self, id: NodeId, event: NodeEvent) {
        if self.delivering.contains(&id) {
            trace!(node = %id, ?event, "event queued behind running delivery");
            self.queued.push((id, event));
            return;
        }
        let mut next = Some(event);
        while let Some(event) = next.take() {
            self.deliver(id, event);
            next = self
                .queued
                .iter()
                .position(|(node, _)| *node == id)
                .map(|pos| self.queued.remove(pos).1);
        }
        if self.delivering.is_empty() {
            self.cancelled.clear();
        }
    }

    fn deliver(&mut self, id: NodeId, event: NodeEvent) {
        let emitter = match self.nodes.get_mut(id) {
            Some(node) if !node.events.is_empty() => std::mem::take(&mut node.events),
            _ => return,
        };
        trace!(node = %id, ?event, "delivering event");
        self.delivering.push(id);
        let emitter = emitter.emit_filtered(&event, self, |doc, sub| !doc.cancelled.contains(&sub));
        self.delivering.pop();

        if let Some(node) = self.nodes.get_mut(id) {
            let added = std::mem::replace(&mut node.events, emitter);
            node.events.absorb(added);
            let cancelled = &self.cancelled;
            if !cancelled.is_empty() {
                node.events.retain(|sub| !cancelled.contains(&sub));
            }
        }
    }

    /// Emit `DescendantChanged` on every ancestor of `source`.
    pub(crate) fn bubble(&mut self, source: NodeId, property: crate::core::Property) {
        let ancestors: Vec<NodeId> = self.ancestors(source).collect();
        for node in ancestors {
            self.emit(
                node,
                NodeEvent::DescendantChanged {
                    node,
                    source,
                    property,
                },
            );
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

//! Arena slots.

use super::Document;
use super::element::Element;
use super::page::Page;
use crate::base::NodeId;
use crate::core::{EventEmitter, NodeEvent};

/// What a node is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Page,
    Step,
    Element,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Document,
    Page(Page),
    Step,
    Element(Element),
}

impl NodeKind {
    pub(crate) fn node_type(&self) -> NodeType {
        match self {
            Self::Document => NodeType::Document,
            Self::Page(_) => NodeType::Page,
            Self::Step => NodeType::Step,
            Self::Element(_) => NodeType::Element,
        }
    }
}

/// How a path listener reacts when its source moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathLink {
    /// The subscriber is a structural child: forward the notification.
    Structural,
    /// The subscriber's group membership must be re-checked.
    Grouping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathListener {
    pub(crate) subscriber: NodeId,
    pub(crate) link: PathLink,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) frozen: bool,
    pub(crate) locked: bool,
    pub(crate) events: EventEmitter<NodeEvent, Document>,
    pub(crate) path_listeners: Vec<PathListener>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            frozen: false,
            locked: false,
            events: EventEmitter::new(),
            path_listeners: Vec::new(),
        }
    }

    pub(crate) fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn page(&self) -> Option<&Page> {
        match &self.kind {
            NodeKind::Page(page) => Some(page),
            _ => None,
        }
    }

    pub(crate) fn page_mut(&mut self) -> Option<&mut Page> {
        match &mut self.kind {
            NodeKind::Page(page) => Some(page),
            _ => None,
        }
    }

    pub(crate) fn unlisten(&mut self, subscriber: NodeId) {
        self.path_listeners.retain(|l| l.subscriber != subscriber);
    }
}

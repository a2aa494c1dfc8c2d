//! Change notification.
//!
//! Every node owns an [`EventEmitter`]. Delivery is synchronous and follows
//! subscription order. The emitter is moved out of its node while it delivers,
//! so listeners can freely mutate the document; listeners registered during a
//! delivery land in a fresh emitter that is merged back afterwards and are not
//! called for that delivery. A listener removed mid-delivery is skipped if its
//! turn has not come yet.

use std::fmt;

use crate::base::{Matrix4, NodeId, Vector3};

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Boxed listener taking the event and a mutable context.
pub type Listener<E, C> = Box<dyn FnMut(&E, &mut C)>;

/// Ordered list of listeners for one event source.
pub struct EventEmitter<E, C> {
    listeners: Vec<(SubscriptionId, Listener<E, C>)>,
}

impl<E, C> EventEmitter<E, C> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, id: SubscriptionId, listener: Listener<E, C>) {
        self.listeners.push((id, listener));
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(sub, _)| *sub == id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Deliver `event` to every listener, consuming and returning the emitter.
    pub fn emit(self, event: &E, context: &mut C) -> Self {
        self.emit_filtered(event, context, |_, _| true)
    }

    /// Like [`EventEmitter::emit`], skipping listeners for which `active`
    /// returns false at the moment their turn comes.
    pub fn emit_filtered(
        mut self,
        event: &E,
        context: &mut C,
        active: impl Fn(&C, SubscriptionId) -> bool,
    ) -> Self {
        for (sub, listener) in &mut self.listeners {
            if active(context, *sub) {
                listener(event, context);
            }
        }
        self
    }

    /// Append listeners that were registered while this emitter was out
    /// delivering an event.
    pub fn absorb(&mut self, later: Self) {
        self.listeners.extend(later.listeners);
    }

    /// Drop listeners whose id fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(SubscriptionId) -> bool) {
        self.listeners.retain(|(sub, _)| keep(*sub));
    }
}

impl<E, C> Default for EventEmitter<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> fmt::Debug for EventEmitter<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Names of the properties reported by [`NodeEvent::Changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Text,
    Colour,
    Vertices,
    Transform,
    TargetName,
    Invert,
    BfcFlag,
    ColourDefinition,
    GroupName,
    Group,
    Texmap,
    Title,
    Author,
    PageType,
    BfcCertification,
    Category,
    Keywords,
    Help,
    History,
    CommandLine,
    License,
    Update,
    Locked,
    ReadOnly,
}

/// Old and new values carried by a change event.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    None,
    Bool(bool),
    Number(u32),
    Text(String),
    Lines(Vec<String>),
    Vertices(Vec<Vector3>),
    Transform(Matrix4),
    Node(NodeId),
}

impl From<Option<String>> for PropertyValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(PropertyValue::None, PropertyValue::Text)
    }
}

impl From<Option<NodeId>> for PropertyValue {
    fn from(value: Option<NodeId>) -> Self {
        value.map_or(PropertyValue::None, PropertyValue::Node)
    }
}

/// Notifications raised by document nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// A property of `node` changed.
    Changed {
        node: NodeId,
        property: Property,
        old: PropertyValue,
        new: PropertyValue,
    },
    /// A property of a descendant changed; raised on every ancestor.
    DescendantChanged {
        node: NodeId,
        source: NodeId,
        property: Property,
    },
    ItemsAdded {
        container: NodeId,
        items: Vec<NodeId>,
    },
    ItemsRemoved {
        container: NodeId,
        items: Vec<NodeId>,
    },
    ItemsCleared {
        container: NodeId,
        count: usize,
    },
    /// The chain of containers between `node` and its document changed.
    PathChanged { node: NodeId },
    Freezing { node: NodeId },
    Frozen { node: NodeId },
    Disposing { node: NodeId },
}

impl NodeEvent {
    /// The node the event was raised on.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Changed { node, .. }
            | Self::DescendantChanged { node, .. }
            | Self::PathChanged { node }
            | Self::Freezing { node }
            | Self::Frozen { node }
            | Self::Disposing { node } => *node,
            Self::ItemsAdded { container, .. }
            | Self::ItemsRemoved { container, .. }
            | Self::ItemsCleared { container, .. } => *container,
        }
    }
}

//! Error types for document operations, parsing and resolution.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::NodeId;

/// The object a state error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A node of a document tree.
    Node(NodeId),
    /// A colour entry, by code.
    Colour(u32),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Colour(code) => write!(f, "colour {code}"),
        }
    }
}

impl From<NodeId> for Subject {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the document model, the parser and the resolver.
///
/// The state errors (`Disposed`, `Frozen`, `Locked`, `ReadOnly`) are reported
/// in that order of precedence when more than one applies.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed single-line input.
    #[error("{source_name}:{line}: {message}")]
    Format {
        source_name: String,
        line: usize,
        message: String,
    },

    /// A page reaches itself through its references.
    #[error("circular reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<SmolStr> },

    /// The node was disposed (or never existed in this document).
    #[error("object {0} has been disposed")]
    Disposed(NodeId),

    /// The object, or one of its ancestors, is frozen.
    #[error("{0} is frozen")]
    Frozen(Subject),

    /// The object is locked.
    #[error("{0} is locked")]
    Locked(Subject),

    /// The owning document is read-only.
    #[error("object {0} is read-only")]
    ReadOnly(NodeId),

    /// The node already has a structural parent.
    #[error("object {0} already belongs to a container")]
    AlreadyAttached(NodeId),

    /// The operation's own precondition failed.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// IO error while reading a source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a format error for `line` (1-based) of `source_name`.
    pub fn format(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-operation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// True for disposed/frozen/locked/read-only violations.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::Disposed(_) | Self::Frozen(_) | Self::Locked(_) | Self::ReadOnly(_)
        )
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_circular_reference(&self) -> bool {
        matches!(self, Self::CircularReference { .. })
    }
}

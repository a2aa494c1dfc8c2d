//! The LDraw document object model.
//!
//! A [`Document`] owns every node in an arena:
//! - the root, standing for the document, holds [`Page`]s
//! - a page holds steps
//! - a step holds [`Element`]s; a texmap element holds geometry of its own
//!
//! Nodes are addressed by [`NodeId`](crate::base::NodeId). Mutation goes
//! through `Document` methods, which check the disposed, frozen, locked and
//! read-only gates in that order and raise [`NodeEvent`](crate::core::NodeEvent)s.
//!
//! Groups are orthogonal to containment: an element joins at most one
//! [`Group`] of its own page.

mod colour;
mod document;
mod element;
mod lifecycle;
mod node;
mod page;
mod properties;
mod reference;
mod topology;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use element::{
    BfcFlag, Comment, Element, ElementKind, Graphic, Group, Primitive, Projection, Reference,
    Texmap, TexmapMode, TexmapSection, Write,
};
pub use node::NodeType;
pub use page::{BfcCertification, Page, PageType};
pub use reference::{LibraryPage, NoResolver, PageResolver, Redirect, ResolvedTarget, Target};

//! Reference targets, the library resolver seam and cycle detection.

use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::Document;
use super::element::{ElementKind, Reference};
use super::node::Node;
use crate::base::text::target_key;
use crate::base::{Matrix4, NodeId};
use crate::core::{Error, Result};

/// Cached link from a reference to the page it places.
#[derive(Debug, Clone)]
pub enum Target {
    /// A page of the same document.
    Local(NodeId),
    /// A page of a library document. The link never keeps it alive.
    External { document: Weak<Document>, page: NodeId },
}

/// A live reference target.
#[derive(Debug, Clone)]
pub enum ResolvedTarget {
    Local(NodeId),
    External { document: Rc<Document>, page: NodeId },
}

impl ResolvedTarget {
    pub fn page(&self) -> NodeId {
        match self {
            Self::Local(page) | Self::External { page, .. } => *page,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// A page found in the parts library.
#[derive(Debug, Clone)]
pub struct LibraryPage {
    pub document: Rc<Document>,
    pub page: NodeId,
}

impl LibraryPage {
    pub fn page(&self) -> Result<&super::Page> {
        self.document.page(self.page)
    }
}

/// Entry of the x-series renumbering table.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub target: SmolStr,
    /// Corrective transform applied after the reference's own transform.
    pub transform: Matrix4,
}

impl Redirect {
    pub fn new(target: impl Into<SmolStr>) -> Self {
        Self {
            target: target.into(),
            transform: Matrix4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.transform = transform;
        self
    }
}

/// Looks up pages that are not part of the document being loaded.
pub trait PageResolver {
    /// Find a library page by target name (case-insensitive).
    fn resolve(&self, name: &str) -> Option<LibraryPage>;

    /// Renumbering entry for an old x-series name.
    fn x_series_redirect(&self, _name: &str) -> Option<Redirect> {
        None
    }
}

/// A resolver that knows no pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl PageResolver for NoResolver {
    fn resolve(&self, _name: &str) -> Option<LibraryPage> {
        None
    }
}

impl Document {
    /// Find a page of this document by target name, case-insensitively.
    pub fn page_by_name(&self, name: &str) -> Option<NodeId> {
        let key = target_key(name);
        self.pages().iter().copied().find(|p| {
            self.nodes
                .get(*p)
                .and_then(Node::page)
                .is_some_and(|page| target_key(page.target_name()) == key)
        })
    }

    /// Every reference in the document naming `name`.
    pub fn references_to(&self, name: &str) -> Vec<NodeId> {
        let key = target_key(name);
        self.elements(self.root())
            .into_iter()
            .filter(|id| {
                matches!(self.kind(*id), Ok(ElementKind::Reference(r)) if target_key(&r.target_name) == key)
            })
            .collect()
    }

    /// The reference a redirect or alias page forwards to: its first one.
    pub fn forwarding_reference(&self, page: NodeId) -> Option<&Reference> {
        self.elements(page)
            .into_iter()
            .find_map(|id| match self.kind(id) {
                Ok(ElementKind::Reference(r)) => Some(r),
                _ => None,
            })
    }

    /// The page placed by reference `id`, without consulting a library.
    pub fn reference_target(&self, id: NodeId) -> Result<Option<ResolvedTarget>> {
        match self.kind(id)? {
            ElementKind::Reference(r) => Ok(self.cached_or_local(r)),
            other => Err(Error::invalid(format!("a {} has no target", other.type_name()))),
        }
    }

    fn cached_or_local(&self, reference: &Reference) -> Option<ResolvedTarget> {
        match &reference.target {
            Some(Target::Local(page)) if self.nodes.get(*page).and_then(Node::page).is_some() => {
                return Some(ResolvedTarget::Local(*page));
            }
            Some(Target::External { document, page }) => {
                if let Some(document) = document.upgrade() {
                    return Some(ResolvedTarget::External {
                        document,
                        page: *page,
                    });
                }
            }
            _ => {}
        }
        self.page_by_name(&reference.target_name).map(ResolvedTarget::Local)
    }

    fn lookup_target(&self, reference: &Reference, resolver: &dyn PageResolver) -> Option<ResolvedTarget> {
        self.cached_or_local(reference).or_else(|| {
            resolver
                .resolve(&reference.target_name)
                .map(|found| ResolvedTarget::External {
                    document: found.document,
                    page: found.page,
                })
        })
    }

    /// Link every reference to its target: a local page first, then the
    /// resolver. Unresolved references keep their name and no target.
    ///
    /// Returns the number of unresolved references.
    pub fn resolve_references(&mut self, resolver: &dyn PageResolver) -> usize {
        let mut unresolved = 0;
        for id in self.elements(self.root()) {
            let target = match self.nodes.get(id).and_then(Node::element).map(|e| &e.kind) {
                Some(ElementKind::Reference(r)) => {
                    match self.page_by_name(&r.target_name) {
                        Some(page) => Some(Target::Local(page)),
                        None => resolver.resolve(&r.target_name).map(|found| Target::External {
                            document: Rc::downgrade(&found.document),
                            page: found.page,
                        }),
                    }
                }
                _ => continue,
            };
            if target.is_none() {
                trace!(reference = %id, "unresolved reference");
                unresolved += 1;
            }
            if let Some(ElementKind::Reference(r)) =
                self.nodes.get_mut(id).and_then(Node::element_mut).map(|e| &mut e.kind)
            {
                r.target = target;
            }
        }
        debug!(unresolved, "references resolved");
        unresolved
    }

    /// Fail if any page reaches itself through references, following
    /// library pages through `resolver`.
    pub fn check_circular_references(&self, resolver: &dyn PageResolver) -> Result<()> {
        let mut detector = CycleDetector {
            resolver,
            chain: Vec::new(),
            done: FxHashSet::default(),
        };
        for page in self.pages() {
            detector.visit(self, *page)?;
        }
        Ok(())
    }
}

/// Depth-first walk keyed by page name; library names are global.
struct CycleDetector<'r> {
    resolver: &'r dyn PageResolver,
    chain: Vec<(String, SmolStr)>,
    done: FxHashSet<String>,
}

impl CycleDetector<'_> {
    fn visit(&mut self, document: &Document, page: NodeId) -> Result<()> {
        let name = document.page(page)?.target_name.clone();
        let key = target_key(&name);
        if self.done.contains(&key) {
            return Ok(());
        }
        if let Some(start) = self.chain.iter().position(|(k, _)| *k == key) {
            let mut chain: Vec<SmolStr> = self.chain[start..].iter().map(|(_, n)| n.clone()).collect();
            chain.push(name);
            return Err(Error::CircularReference { chain });
        }

        self.chain.push((key.clone(), name));
        for id in document.elements(page) {
            let ElementKind::Reference(reference) = document.kind(id)? else {
                continue;
            };
            match document.lookup_target(reference, self.resolver) {
                Some(ResolvedTarget::Local(target)) => self.visit(document, target)?,
                Some(ResolvedTarget::External {
                    document: external,
                    page: target,
                }) => self.visit(&external, target)?,
                None => {}
            }
        }
        self.chain.pop();
        self.done.insert(key);
        Ok(())
    }
}

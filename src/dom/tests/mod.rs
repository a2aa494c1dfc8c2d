#![allow(clippy::unwrap_used, clippy::expect_used)]

mod tests_lifecycle;

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::base::{Matrix4, NodeId, Vector3};
use crate::core::NodeEvent;

/// A document with one page (`model.ldr`) holding one step.
pub(super) struct Fixture {
    pub doc: Document,
    pub page: NodeId,
    pub step: NodeId,
}

pub(super) fn fixture() -> Fixture {
    let mut doc = Document::new();
    let page = doc.create_page(Page::new("model.ldr")).unwrap();
    doc.add(doc.root(), page).unwrap();
    let step = doc.create_step().unwrap();
    doc.add(page, step).unwrap();
    doc.clear_modified();
    Fixture { doc, page, step }
}

pub(super) fn add_element(doc: &mut Document, step: NodeId, kind: ElementKind) -> NodeId {
    let id = doc.create_element(kind).unwrap();
    doc.add(step, id).unwrap();
    id
}

pub(super) fn reference(name: &str) -> ElementKind {
    ElementKind::Reference(Reference::new(4, Matrix4::IDENTITY, name))
}

pub(super) fn line() -> ElementKind {
    ElementKind::Graphic(Graphic::line(
        24,
        Vector3::ZERO,
        Vector3::new(1.0, 0.0, 0.0),
    ))
}

/// Subscribe a recorder to `id`.
pub(super) fn record(doc: &mut Document, id: NodeId) -> Rc<RefCell<Vec<NodeEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    doc.subscribe(id, move |event, _| sink.borrow_mut().push(event.clone()))
        .unwrap();
    events
}

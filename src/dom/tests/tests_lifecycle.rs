#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};

use super::*;
use crate::core::{Error, Property};

#[test]
fn test_dispose_twice_is_an_error() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));

    f.doc.dispose(element).unwrap();
    assert!(!f.doc.contains(element));
    assert!(f.doc.children(f.step).unwrap().is_empty());
    assert!(matches!(f.doc.dispose(element), Err(Error::Disposed(id)) if id == element));
}

#[test]
fn test_dispose_frozen_fails() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    f.doc.freeze(f.page).unwrap();

    assert!(matches!(f.doc.dispose(element), Err(Error::Frozen(_))));
    assert!(matches!(f.doc.dispose(f.step), Err(Error::Frozen(_))));
    assert!(f.doc.contains(element));
}

#[test]
fn test_dispose_cascades_and_notifies() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let on_element = record(&mut f.doc, element);
    let on_page = record(&mut f.doc, f.page);

    f.doc.dispose(f.step).unwrap();

    assert!(!f.doc.contains(element));
    assert_eq!(*on_element.borrow(), vec![NodeEvent::Disposing { node: element }]);
    assert_eq!(
        *on_page.borrow(),
        vec![NodeEvent::ItemsRemoved {
            container: f.page,
            items: vec![f.step]
        }]
    );
    assert!(matches!(f.doc.subscriber_count(element), Err(Error::Disposed(_))));
}

#[test]
fn test_dispose_root_disposes_everything() {
    let mut f = fixture();
    let detached = f.doc.create_step().unwrap();
    let root = f.doc.root();

    f.doc.dispose(root).unwrap();

    assert!(!f.doc.is_alive());
    assert!(!f.doc.contains(f.page));
    assert!(!f.doc.contains(detached));
    assert!(f.doc.pages().is_empty());
    assert!(matches!(f.doc.create_step(), Err(Error::Disposed(_))));
    assert!(matches!(f.doc.dispose(root), Err(Error::Disposed(_))));
}

#[test]
fn test_freeze_order_and_idempotence() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let events = Rc::new(RefCell::new(Vec::new()));
    for id in [f.step, element] {
        let sink = Rc::clone(&events);
        f.doc
            .subscribe(id, move |event, _| sink.borrow_mut().push(event.clone()))
            .unwrap();
    }

    f.doc.freeze(f.step).unwrap();
    assert_eq!(
        *events.borrow(),
        vec![
            NodeEvent::Freezing { node: f.step },
            NodeEvent::Freezing { node: element },
            NodeEvent::Frozen { node: element },
            NodeEvent::Frozen { node: f.step },
        ]
    );

    f.doc.freeze(f.step).unwrap();
    assert_eq!(events.borrow().len(), 4);
    assert!(f.doc.is_frozen(element).unwrap());
    assert!(!f.doc.is_frozen(f.page).unwrap());
}

#[test]
fn test_freeze_colour_element_freezes_entry() {
    let mut f = fixture();
    let entry = crate::colour::ColourEntry::parse_definition(
        "Red CODE 4 VALUE #C91A09 EDGE #333333",
    )
    .unwrap();
    let colour = add_element(&mut f.doc, f.step, ElementKind::Colour(entry));
    f.doc.freeze(colour).unwrap();

    let ElementKind::Colour(entry) = f.doc.kind(colour).unwrap() else {
        panic!("expected a colour element");
    };
    assert!(entry.is_frozen());
}

#[test]
fn test_gate_order() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));

    f.doc.set_read_only(true).unwrap();
    assert!(matches!(f.doc.set_text(element, "// b"), Err(Error::ReadOnly(_))));

    f.doc.lock(element).unwrap();
    assert!(matches!(f.doc.set_text(element, "// b"), Err(Error::Locked(_))));

    f.doc.freeze(f.step).unwrap();
    assert!(matches!(f.doc.set_text(element, "// b"), Err(Error::Frozen(_))));

    f.doc.dispose(f.doc.root()).ok();
    assert!(matches!(f.doc.set_text(element, "// b"), Err(Error::Disposed(_))));
}

#[test]
fn test_lock_is_reversible_and_not_inherited() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));

    f.doc.lock(f.step).unwrap();
    f.doc.set_text(element, "// child still editable").unwrap();
    let other = f.doc.create_element(ElementKind::Pause).unwrap();
    assert!(matches!(f.doc.add(f.step, other), Err(Error::Locked(_))));

    f.doc.unlock(f.step).unwrap();
    f.doc.add(f.step, other).unwrap();
    assert!(!f.doc.is_locked(f.step).unwrap());
}

#[test]
fn test_lock_frozen_fails() {
    let mut f = fixture();
    f.doc.freeze(f.step).unwrap();
    assert!(matches!(f.doc.lock(f.step), Err(Error::Frozen(_))));
}

#[test]
fn test_listener_added_during_delivery_waits_for_next_event() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let late_calls = Rc::new(Cell::new(0));
    let armed = Rc::new(Cell::new(false));

    let (calls, flag) = (Rc::clone(&late_calls), Rc::clone(&armed));
    f.doc
        .subscribe(element, move |event, doc| {
            if flag.replace(true) {
                return;
            }
            let calls = Rc::clone(&calls);
            doc.subscribe(event.node(), move |_, _| calls.set(calls.get() + 1))
                .unwrap();
        })
        .unwrap();

    f.doc.set_text(element, "// b").unwrap();
    assert_eq!(late_calls.get(), 0);
    assert_eq!(f.doc.subscriber_count(element).unwrap(), 2);

    f.doc.set_text(element, "// c").unwrap();
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn test_unsubscribe_during_delivery() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let own_id = Rc::new(Cell::new(None));
    let calls = Rc::new(Cell::new(0));

    let (slot, counter) = (Rc::clone(&own_id), Rc::clone(&calls));
    let id = f
        .doc
        .subscribe(element, move |event, doc| {
            counter.set(counter.get() + 1);
            if let Some(id) = slot.get() {
                assert!(doc.unsubscribe(event.node(), id).unwrap());
            }
        })
        .unwrap();
    own_id.set(Some(id));

    f.doc.set_text(element, "// b").unwrap();
    f.doc.set_text(element, "// c").unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(f.doc.subscriber_count(element).unwrap(), 0);
}

#[test]
fn test_event_raised_by_listener_on_same_node_is_delivered() {
    let mut f = fixture();
    let step = f.step;
    let armed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&armed);
    f.doc
        .subscribe(step, move |event, doc| {
            if matches!(event, NodeEvent::ItemsAdded { .. }) && !flag.replace(true) {
                add_element(doc, step, line());
            }
        })
        .unwrap();
    let events = record(&mut f.doc, step);

    let first = add_element(&mut f.doc, step, ElementKind::comment("// a"));
    let children = f.doc.children(step).unwrap().to_vec();
    assert_eq!(children.len(), 2);

    let added: Vec<Vec<NodeId>> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            NodeEvent::ItemsAdded { items, .. } => Some(items.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec![vec![first], vec![children[1]]]);
}

#[test]
fn test_nested_event_reaches_listener_added_during_delivery() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let late = Rc::new(RefCell::new(Vec::new()));
    let armed = Rc::new(Cell::new(false));

    let (sink, flag) = (Rc::clone(&late), Rc::clone(&armed));
    f.doc
        .subscribe(element, move |event, doc| {
            if flag.replace(true) {
                return;
            }
            let sink = Rc::clone(&sink);
            doc.subscribe(event.node(), move |e, _| sink.borrow_mut().push(e.clone()))
                .unwrap();
            doc.set_text(event.node(), "// nested").unwrap();
        })
        .unwrap();

    f.doc.set_text(element, "// b").unwrap();
    let late = late.borrow();
    assert_eq!(late.len(), 1);
    assert!(matches!(
        &late[0],
        NodeEvent::Changed { new: crate::core::PropertyValue::Text(t), .. } if t == "// nested"
    ));
}

#[test]
fn test_listener_removed_by_earlier_listener_is_skipped() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let victim = Rc::new(Cell::new(None));
    let calls = Rc::new(Cell::new(0));

    let slot = Rc::clone(&victim);
    f.doc
        .subscribe(element, move |event, doc| {
            if let Some(id) = slot.take() {
                assert!(doc.unsubscribe(event.node(), id).unwrap());
            }
        })
        .unwrap();
    let counter = Rc::clone(&calls);
    let id = f
        .doc
        .subscribe(element, move |_, _| counter.set(counter.get() + 1))
        .unwrap();
    victim.set(Some(id));

    f.doc.set_text(element, "// b").unwrap();
    f.doc.set_text(element, "// c").unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(f.doc.subscriber_count(element).unwrap(), 1);
}

#[test]
fn test_listener_can_mutate_document() {
    let mut f = fixture();
    let element = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));
    let mirror = add_element(&mut f.doc, f.step, ElementKind::comment("// a"));

    f.doc
        .subscribe(element, move |event, doc| {
            if let NodeEvent::Changed {
                property: Property::Text,
                new: crate::core::PropertyValue::Text(text),
                ..
            } = event
            {
                doc.set_text(mirror, text).unwrap();
            }
        })
        .unwrap();

    f.doc.set_text(element, "// copied").unwrap();
    match f.doc.kind(mirror).unwrap() {
        ElementKind::Comment(c) => assert_eq!(c.text(), "// copied"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_read_only_blocks_structure() {
    let mut f = fixture();
    f.doc.set_read_only(true).unwrap();
    let step = f.doc.create_step().unwrap();
    assert!(matches!(f.doc.add(f.page, step), Err(Error::ReadOnly(_))));
    f.doc.set_read_only(false).unwrap();
    f.doc.add(f.page, step).unwrap();
    assert!(f.doc.is_modified());
}

//! Mutation gates and change notification on a loaded document.

use std::cell::RefCell;
use std::rc::Rc;

use ldraw::core::Property;
use ldraw::{CodeStandard, Error, NodeEvent};

use crate::helpers::parse;
use crate::helpers::source_fixtures::HOUSE_MPD;

#[test]
fn test_changes_bubble_to_the_root() {
    let mut doc = parse(HOUSE_MPD, "house.mpd");
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    doc.subscribe(doc.root(), move |event, _| sink.borrow_mut().push(event.clone()))
        .unwrap();

    let brick = doc.elements(doc.pages()[1])[0];
    doc.set_colour(brick, 1).unwrap();
    assert!(doc.is_modified());
    match events.borrow().as_slice() {
        [NodeEvent::DescendantChanged { source, property, .. }] => {
            assert_eq!(*source, brick);
            assert_eq!(*property, Property::Colour);
        }
        other => panic!("unexpected events {other:?}"),
    }

    let out = doc.to_code_string(doc.pages()[1], CodeStandard::Full).unwrap();
    assert!(out.starts_with("1 1 -40 0 0"));
}

#[test]
fn test_gate_precedence() {
    let mut doc = parse(HOUSE_MPD, "house.mpd");
    let page = doc.pages()[2];
    let element = doc.elements(page)[0];

    doc.lock(element).unwrap();
    assert!(matches!(doc.set_colour(element, 2), Err(Error::Locked(_))));
    doc.set_read_only(true).unwrap();
    assert!(matches!(doc.set_colour(element, 2), Err(Error::Locked(_))));
    doc.unlock(element).unwrap();
    assert!(matches!(doc.set_colour(element, 2), Err(Error::ReadOnly(_))));
    doc.set_read_only(false).unwrap();
    doc.lock(element).unwrap();

    doc.freeze(page).unwrap();
    let err = doc.set_colour(element, 2).unwrap_err();
    assert!(matches!(err, Error::Frozen(_)));
    assert!(err.is_state_error());
    assert!(matches!(doc.dispose(element), Err(Error::Frozen(_))));
}

#[test]
fn test_freeze_events() {
    let mut doc = parse(HOUSE_MPD, "house.mpd");
    let page = doc.pages()[2];
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    doc.subscribe(page, move |event, _| sink.borrow_mut().push(event.clone()))
        .unwrap();
    doc.freeze(page).unwrap();
    doc.freeze(page).unwrap();
    assert_eq!(
        *events.borrow(),
        vec![NodeEvent::Freezing { node: page }, NodeEvent::Frozen { node: page }]
    );
}

#[test]
fn test_dispose_page() {
    let mut doc = parse(HOUSE_MPD, "house.mpd");
    let roof = doc.pages()[2];
    let inside = doc.elements(roof);
    doc.dispose(roof).unwrap();
    assert_eq!(doc.pages().len(), 2);
    assert!(inside.iter().all(|id| !doc.contains(*id)));
    assert!(matches!(doc.dispose(roof), Err(Error::Disposed(_))));
    assert!(matches!(doc.set_colour(inside[0], 1), Err(Error::Disposed(_))));
}

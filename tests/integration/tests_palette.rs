//! The system palette and document-local colour tables.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ldraw::colour::Rgba;
use ldraw::{Palette, Parser};
use parking_lot::Mutex;

use crate::helpers::parse;

const CONFIG: &str = "0 LDraw.org Configuration File\r
0 !COLOUR Black CODE 0 VALUE #1B2A34 EDGE #808080\r
0 !COLOUR Red CODE 4 VALUE #C91A09 EDGE #333333\r
";

#[test]
fn test_replacement_notifies_subscribers() {
    let palette = Palette::with_defaults();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let counter = Arc::clone(&calls);
    let sink = Arc::clone(&seen);
    let subscription = palette.subscribe(move |table| {
        counter.fetch_add(1, Ordering::SeqCst);
        sink.lock().push(table.len());
    });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    assert_eq!(palette.load_file(file.path()).unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock(), vec![2]);
    assert_eq!(palette.entry(4).unwrap().value(), Rgba::opaque(0xC9, 0x1A, 0x09));

    assert!(palette.unsubscribe(subscription));
    palette.load_str(CONFIG, "LDConfig.ldr").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_snapshots_survive_replacement() {
    let palette = Palette::with_defaults();
    let before = palette.table();
    palette.load_str(CONFIG, "LDConfig.ldr").unwrap();
    assert!(before.get(15).is_some());
    assert!(palette.table().get(15).is_none());
}

#[test]
fn test_bad_config_keeps_palette() {
    let palette = Palette::with_defaults();
    let err = palette
        .load_str("0 !COLOUR Bad CODE x VALUE #000000 EDGE #000000\n", "bad.ldr")
        .unwrap_err();
    assert!(err.is_format_error());
    assert!(palette.entry(15).is_some());
}

#[test]
fn test_local_definitions_shadow_palette() {
    let palette = Palette::with_defaults();
    let doc = parse(
        "0 // x\n\
         1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n\
         0 !COLOUR Red CODE 4 VALUE #FF0000 EDGE #333333\n\
         1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n",
        "model.ldr",
    );
    let elements = doc.elements(doc.root());
    let base = palette.table();

    let before = doc.colour_table_with(elements[1], &base).unwrap();
    assert!(Arc::ptr_eq(&before, &base));

    let after = doc.colour_table_with(elements[3], &base).unwrap();
    let red = after.get(4).unwrap();
    assert_eq!(red.value(), Rgba::opaque(0xFF, 0, 0));
    assert!(red.is_frozen());
    assert!(after.is_frozen());
    assert_eq!(after.len(), base.len());
}

#[test]
fn test_definitions_carry_across_steps() {
    let palette = Palette::with_defaults();
    let doc = Parser::default()
        .parse_str(
            "0 !COLOUR Custom CODE 500 VALUE #123456 EDGE #000000\n0 STEP\n2 500 0 0 0 1 0 0\n",
            "model.ldr",
        )
        .unwrap()
        .loaded()
        .unwrap()
        .document;
    let line = *doc.elements(doc.root()).last().unwrap();
    let table = doc.colour_table_with(line, &palette.table()).unwrap();
    assert_eq!(table.get(500).unwrap().name(), "Custom");
}

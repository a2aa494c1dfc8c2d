//! Loading against a parts library: resolution and redirects.

use ldraw::dom::{ElementKind, Redirect};
use ldraw::{CodeStandard, Document, Error, Matrix4, ParseOptions, Parser};

use crate::helpers::library::Library;
use crate::helpers::source_fixtures::LIBRARY_MPD;

fn load(text: &str, library: &Library, options: ParseOptions) -> (Document, bool) {
    let parsed = Parser::new(options)
        .with_resolver(library)
        .parse_str(text, "model.ldr")
        .unwrap()
        .loaded()
        .unwrap();
    (parsed.document, parsed.document_modified)
}

/// Target name and translation of the first reference.
fn first_reference(doc: &Document) -> (String, [f64; 3]) {
    let id = doc.elements(doc.root())[0];
    match doc.kind(id).unwrap() {
        ElementKind::Reference(r) => {
            let values = r.transform().to_ldraw();
            (r.target_name().to_string(), [values[0], values[1], values[2]])
        }
        other => panic!("expected a reference, found {other:?}"),
    }
}

#[test]
fn test_library_references_resolve() {
    let library = Library::new(LIBRARY_MPD);
    let (doc, modified) = load(
        "1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n",
        &library,
        ParseOptions::default(),
    );
    assert!(!modified);
    let reference = doc.elements(doc.root())[0];
    let target = doc.reference_target(reference).unwrap().unwrap();
    assert!(!target.is_local());
    assert!(doc.analyse(doc.root(), CodeStandard::Full).unwrap().is_empty());
}

#[test]
fn test_moved_to_followed() {
    let library = Library::new(LIBRARY_MPD);
    let (doc, modified) = load(
        "1 4 0 0 5 1 0 0 0 1 0 0 0 1 3002old.dat\n",
        &library,
        ParseOptions::default(),
    );
    assert!(modified);
    assert!(doc.is_modified());
    assert_eq!(first_reference(&doc), ("3002.dat".to_string(), [10.0, 0.0, 5.0]));
}

#[test]
fn test_redirects_disabled() {
    let library = Library::new(LIBRARY_MPD);
    let options = ParseOptions::default()
        .with_follow_redirects(false)
        .with_follow_aliases(false);
    let (doc, modified) = load(
        "1 4 0 0 0 1 0 0 0 1 0 0 0 1 3002old.dat\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 3003a.dat\n",
        &library,
        options,
    );
    assert!(!modified);
    assert_eq!(first_reference(&doc).0, "3002old.dat");
    let out = doc.to_code_string(doc.root(), CodeStandard::Full).unwrap();
    assert!(out.contains("3003a.dat"));
}

#[test]
fn test_x_series_applied_before_alias() {
    let corrective = Matrix4::translation(0.0, 0.0, 2.0);
    let library = Library::new(LIBRARY_MPD)
        .with_x_series("x3003.dat", Redirect::new("3003a.dat").with_transform(corrective));
    let (doc, modified) = load(
        "1 4 5 0 0 1 0 0 0 1 0 0 0 1 x3003.dat\n",
        &library,
        ParseOptions::default(),
    );
    assert!(modified);
    assert_eq!(first_reference(&doc), ("3003.dat".to_string(), [5.0, -8.0, 2.0]));
}

#[test]
fn test_x_series_without_following() {
    let library = Library::new(LIBRARY_MPD).with_x_series("x3003.dat", Redirect::new("3003a.dat"));
    let (doc, _) = load(
        "1 4 0 0 0 1 0 0 0 1 0 0 0 1 x3003.dat\n",
        &library,
        ParseOptions::default().with_follow_aliases(false),
    );
    assert_eq!(first_reference(&doc).0, "3003a.dat");
}

#[test]
fn test_cycle_through_library() {
    let library = Library::new(
        "0 FILE loop.dat\n1 16 0 0 0 1 0 0 0 1 0 0 0 1 model.ldr\n0 FILE model.ldr\n0 // library copy\n",
    );
    let err = Parser::default()
        .with_resolver(&library)
        .parse_str("1 4 0 0 0 1 0 0 0 1 0 0 0 1 loop.dat\n", "model.ldr")
        .unwrap_err();
    match err {
        Error::CircularReference { chain } => {
            let names: Vec<&str> = chain.iter().map(|n| n.as_str()).collect();
            assert_eq!(names, ["model.ldr", "loop.dat", "model.ldr"]);
        }
        other => panic!("expected a cycle, found {other}"),
    }
}

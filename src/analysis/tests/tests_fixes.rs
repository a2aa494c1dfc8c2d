use super::*;
use crate::core::Error;
use crate::parser::ParseOptions;

fn fix_all(doc: &mut Document, standard: CodeStandard) {
    for problem in doc.analyse(doc.root(), standard).unwrap() {
        if let Some(fix) = problem.fixes.first() {
            doc.apply_fix(fix).unwrap();
        }
    }
}

#[test]
fn test_prefix_comment() {
    let mut doc = parse("0 // x\n0 roof goes here\n");
    fix_all(&mut doc, CodeStandard::Full);
    let second = doc.elements(doc.root())[1];
    match doc.kind(second).unwrap() {
        crate::dom::ElementKind::Comment(comment) => assert_eq!(comment.text(), "// roof goes here"),
        other => panic!("expected a comment, found {other:?}"),
    }
    assert!(doc.analyse(doc.root(), CodeStandard::Full).unwrap().is_empty());
}

#[test]
fn test_fixes_make_part_clean() {
    let text = format!("{CLEAN_PART}0 PAUSE\n2 4 0 0 0 0 1 0\n3 16 0 0 0 0 0 0 1 1 1\n0 !COLOUR Glow CODE 500 VALUE #FF8800 EDGE #333333\n");
    let mut doc = parse(&text);
    let before = doc.elements(doc.root()).len();
    fix_all(&mut doc, CodeStandard::PartsLibrary);
    assert!(codes_of(&doc, CodeStandard::PartsLibrary).is_empty());
    assert_eq!(doc.elements(doc.root()).len(), before - 3);
    assert!(doc.is_modified());
}

#[test]
fn test_removed_nodes_are_disposed() {
    let mut doc = parse("0 // x\n2 24 0 0 0 0 0 0\n");
    let line = doc.elements(doc.root())[1];
    fix_all(&mut doc, CodeStandard::Full);
    assert!(!doc.contains(line));
}

#[test]
fn test_fix_respects_read_only() {
    let mut doc = Parser::new(ParseOptions::default().with_read_only(true))
        .parse_str("0 // x\n0 not marked\n", "model.ldr")
        .unwrap()
        .loaded()
        .unwrap()
        .document;
    let problems = doc.analyse(doc.root(), CodeStandard::Full).unwrap();
    let err = doc.apply_fix(&problems[0].fixes[0]).unwrap_err();
    assert!(matches!(err, Error::ReadOnly(_)));
}

#[test]
fn test_fix_on_frozen_document() {
    let mut doc = Parser::new(ParseOptions::default().with_freeze(true))
        .parse_str("0 // x\n2 24 0 0 0 0 0 0\n", "model.ldr")
        .unwrap()
        .loaded()
        .unwrap()
        .document;
    let problems = doc.analyse(doc.root(), CodeStandard::Full).unwrap();
    let err = doc.apply_fix(&problems[0].fixes[0]).unwrap_err();
    assert!(matches!(err, Error::Frozen(_)));
}

//! Problems and fixes through the public API.

use ldraw::analysis::codes;
use ldraw::{CodeStandard, Severity};

use crate::helpers::source_fixtures::BRICK_PART;
use crate::helpers::{crlf, parse};

#[test]
fn test_published_part_is_clean() {
    let doc = parse(BRICK_PART, "3004.dat");
    let problems = doc.analyse(doc.root(), CodeStandard::PartsLibrary).unwrap();
    // box5.dat is not available without a library.
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].code, codes::UNRESOLVED_REFERENCE);
    assert_eq!(problems[0].severity, Severity::Warning);
    assert!(problems[0].fixes.is_empty());
}

#[test]
fn test_fixing_a_model_for_the_library() {
    let text = crlf(&[
        "0 Plate  1 x  1",
        "0 Name: 3024.dat",
        "0 Author: James Jessiman",
        "0 BFC CERTIFY CCW",
        "0 top face",
        "0 PAUSE",
        "4 16 10 0 10 -10 0 10 -10 0 -10 10 0 -10",
        "2 4 10 0 10 -10 0 10",
        "2 24 10 0 10 10 0 10",
    ]);
    let mut doc = parse(&text, "3024.dat");
    let problems = doc.analyse(doc.root(), CodeStandard::PartsLibrary).unwrap();
    let found: Vec<&str> = problems.iter().map(|p| p.code).collect();
    assert_eq!(
        found,
        vec![
            codes::MISSING_COMMENT_MARKER,
            codes::INSTRUCTION_COMMAND,
            codes::LINE_COLOUR,
            codes::DEGENERATE_GEOMETRY,
        ]
    );

    for problem in &problems {
        doc.apply_fix(&problem.fixes[0]).unwrap();
    }
    assert!(doc.analyse(doc.root(), CodeStandard::PartsLibrary).unwrap().is_empty());
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::PartsLibrary).unwrap(),
        crlf(&[
            "0 Plate  1 x  1",
            "0 Name: 3024.dat",
            "0 Author: James Jessiman",
            "0 !LDRAW_ORG Part",
            "0 BFC CERTIFY CCW",
            "0 // top face",
            "4 16 10 0 10 -10 0 10 -10 0 -10 10 0 -10",
            "2 24 10 0 10 -10 0 10",
        ])
    );
}

#[test]
fn test_problem_display() {
    let doc = parse("0 // x\n0 PAUSE\n", "part.dat");
    let problems = doc.analyse(doc.root(), CodeStandard::PartsLibrary).unwrap();
    let pause = problems
        .iter()
        .find(|p| p.code == codes::INSTRUCTION_COMMAND)
        .unwrap();
    let shown = pause.to_string();
    assert!(shown.starts_with("warning[W0002]"));
    assert!(shown.ends_with("pause commands are not written for library parts"));
}

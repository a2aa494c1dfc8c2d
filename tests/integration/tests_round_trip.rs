//! Parse → serialize through the public API.

use std::io::Write;

use ldraw::{CodeStandard, Parser};
use rstest::rstest;

use crate::helpers::source_fixtures::{BRICK_PART, HOUSE_MPD};
use crate::helpers::{crlf, parse};

#[test]
fn test_mpd_round_trip() {
    let doc = parse(HOUSE_MPD, "house.mpd");
    assert!(doc.is_multi_page());
    assert_eq!(doc.pages().len(), 3);
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::Full).unwrap(),
        HOUSE_MPD
    );
}

#[test]
fn test_header_round_trip() {
    let doc = parse(BRICK_PART, "3004.dat");
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::PartsLibrary).unwrap(),
        BRICK_PART
    );
}

#[test]
fn test_parts_library_profile_drops_grouping() {
    let doc = parse(HOUSE_MPD, "house.mpd");
    let out = doc.to_code_string(doc.root(), CodeStandard::PartsLibrary).unwrap();
    assert!(!out.contains("GROUP"));
    assert!(!out.contains("MLCAD"));
    assert!(out.contains("1 4 0 -72 0 1 0 0 0 1 0 0 0 1 roof.ldr\r\n"));

    let repository = doc
        .to_code_string(doc.root(), CodeStandard::OfficialModelRepository)
        .unwrap();
    assert_eq!(repository, HOUSE_MPD);
}

#[rstest]
#[case("0 BFC CW", "0 BFC CW")]
#[case("0 BFC CCW", "0 BFC CCW")]
#[case("0 BFC CLIP", "0 BFC CLIP")]
#[case("0 BFC NOCLIP", "0 BFC NOCLIP")]
#[case("0 BFC CLIP CW", "0 BFC CLIP CW")]
#[case("0 BFC CW CLIP", "0 BFC CLIP CW")]
#[case("0 BFC CLIP CCW", "0 BFC CLIP CCW")]
#[case("0 BFC CCW CLIP", "0 BFC CLIP CCW")]
fn test_bfc_forms(#[case] source: &str, #[case] expected: &str) {
    let doc = parse(&format!("0 // x\n{source}\n"), "part.dat");
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::Full).unwrap(),
        crlf(&["0 // x", expected])
    );
}

#[test]
fn test_load_file_round_trip() {
    let mut file = tempfile::Builder::new().suffix(".mpd").tempfile().unwrap();
    file.write_all(HOUSE_MPD.as_bytes()).unwrap();

    let parsed = Parser::default().load_file(file.path()).unwrap().loaded().unwrap();
    assert!(!parsed.document_modified);
    let doc = parsed.document;
    let source = doc.source_path().unwrap();
    assert!(source.is_absolute());
    assert_eq!(source, file.path());
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::Full).unwrap(),
        HOUSE_MPD
    );
}

#[test]
fn test_lf_input_written_as_crlf() {
    let text = "1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n0 STEP\n2 24 0 0 0 1 0 0\n";
    let doc = parse(text, "model.ldr");
    assert_eq!(
        doc.to_code_string(doc.root(), CodeStandard::Full).unwrap(),
        text.replace('\n', "\r\n")
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Parser::default()
        .load_file(dir.path().join("absent.ldr"))
        .unwrap_err();
    assert!(matches!(err, ldraw::Error::Io(_)));
}

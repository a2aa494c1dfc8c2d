#![allow(clippy::unwrap_used, clippy::expect_used)]

mod tests_fixes;

use super::*;
use crate::dom::Document;
use crate::parser::Parser;
use crate::serializer::CodeStandard;

pub(super) fn parse(text: &str) -> Document {
    Parser::default()
        .parse_str(text, "part.dat")
        .unwrap()
        .loaded()
        .unwrap()
        .document
}

/// The codes of the problems found in the whole document.
pub(super) fn codes_of(doc: &Document, standard: CodeStandard) -> Vec<&'static str> {
    doc.analyse(doc.root(), standard)
        .unwrap()
        .iter()
        .map(|p| p.code)
        .collect()
}

pub(super) const CLEAN_PART: &str = "0 Brick  1 x  1\n\
0 Name: part.dat\n\
0 Author: James Jessiman\n\
0 BFC CERTIFY CCW\n\
2 24 0 0 0 1 0 0\n\
3 16 0 0 0 1 0 0 0 1 0\n";

//! Logos-based field lexer for LDraw lines
//!
//! An LDraw line is a sequence of whitespace-separated fields. The lexer
//! classifies each field so geometry parsing can reject non-numeric input
//! without re-scanning, and keeps byte spans so trailing free text (file
//! names, comments) can be sliced from the original line.

use std::ops::Range;

use logos::Logos;

/// Field classes.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", priority = 3)]
    Number,

    #[regex(r"(0x|0X|#)[0-9A-Fa-f]+", priority = 4)]
    HexCode,

    #[regex(r"[^ \t\r\n]+", priority = 1)]
    Word,
}

/// One field of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    pub kind: FieldKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

impl Field<'_> {
    /// Parse as a coordinate or matrix entry.
    pub fn number(&self) -> Result<f64, String> {
        if self.kind != FieldKind::Number {
            return Err(format!("expected a number, found '{}'", self.text));
        }
        self.text
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", self.text))
    }
}

/// Split `line` into fields, dropping whitespace.
pub fn fields(line: &str) -> Vec<Field<'_>> {
    let mut lexer = FieldKind::lexer(line);
    let mut out = Vec::new();
    while let Some(token) = lexer.next() {
        let kind = match token {
            Ok(FieldKind::Whitespace) => continue,
            Ok(kind) => kind,
            Err(()) => FieldKind::Word,
        };
        out.push(Field {
            kind,
            text: lexer.slice(),
            span: lexer.span(),
        });
    }
    out
}

/// The text of `line` from the start of field `index` to the end, trimmed.
pub fn rest_of_line<'a>(line: &'a str, fields: &[Field<'a>], index: usize) -> &'a str {
    fields
        .get(index)
        .map_or("", |field| line[field.span.start..].trim())
}

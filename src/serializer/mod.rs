//! Document tree → LDraw text
//!
//! Every node can write itself through [`Document::to_code`]. Output always
//! uses CR+LF line endings and canonical spellings, so parsing and writing a
//! document reproduces the source when nothing was redirected or renamed.
//!
//! The [`CodeStandard`] selects what is written:
//!
//! | Content                                   | Full | Model repository | Parts library |
//! |-------------------------------------------|------|------------------|---------------|
//! | `CLEAR` `PAUSE` `SAVE` `WRITE`            | yes  | yes              | no            |
//! | `GROUP` and `MLCAD BTG` prefixes          | yes  | yes              | no            |
//! | `!LDRAW_ORG` for default page types       | no   | no               | yes           |
//!
//! [`Document::to_code`]: crate::dom::Document::to_code

mod options;
mod writer;

#[cfg(test)]
mod tests;

pub use options::{CodeStandard, WindingDirection};

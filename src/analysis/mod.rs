//! Lint checks over a document tree.
//!
//! [`Document::analyse`](crate::dom::Document::analyse) walks a node and its
//! descendants and reports [`Problem`]s. What counts as a problem depends on
//! the [`CodeStandard`](crate::serializer::CodeStandard): a plain comment is
//! a warning in a personal model and an error in a file meant for
//! publication. Problems may carry [`Fix`]es, applied with
//! [`Document::apply_fix`](crate::dom::Document::apply_fix).

mod checks;
mod problem;

#[cfg(test)]
mod tests;

pub use problem::{Fix, FixAction, Problem, ProblemCollector, Severity, codes};

//! # ldraw-dom
//!
//! Document model, parser and serializer for LDraw brick-model files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis   → Problems and fixes per output profile
//!   ↓
//! serializer → Tree → CR+LF text, three output profiles
//!   ↓
//! parser     → Logos lexer, page builder, meta-command registry, redirects
//!   ↓
//! dom        → Arena-backed tree: pages, steps, elements, groups
//!   ↓
//! colour     → Colour entries, tables, the process-wide palette
//!   ↓
//! core       → Errors and node events
//!   ↓
//! base       → Handles, vectors and matrices, text helpers
//! ```
//!
//! ```ignore
//! use ldraw::{CodeStandard, Parser};
//!
//! let parsed = Parser::default().load_file("house.mpd")?.loaded().unwrap();
//! let doc = parsed.document;
//! let text = doc.to_code_string(doc.root(), CodeStandard::Full)?;
//! ```

// ============================================================================
// MODULES (dependency order: base → core → colour → dom → parser → serializer → analysis)
// ============================================================================

/// Foundation types: NodeId, Arena, Vector3, Matrix4, text helpers
pub mod base;

/// Errors and node events
pub mod core;

/// Colour entries, colour tables and the system palette
pub mod colour;

/// The document tree
pub mod dom;

/// LDraw text → document tree
pub mod parser;

/// Document tree → LDraw text
pub mod serializer;

/// Lint checks with fixes
pub mod analysis;

// Re-export commonly needed items
pub use analysis::{Fix, Problem, Severity};
pub use base::{Matrix4, NodeId, Vector3};
pub use colour::{ColourEntry, ColourTable, Palette};
pub use core::{Error, NodeEvent, Result};
pub use dom::{Document, ElementKind, NodeType, Page, PageResolver};
pub use parser::{LoadOutcome, ParseOptions, ParsedDocument, Parser};
pub use serializer::{CodeStandard, WindingDirection};

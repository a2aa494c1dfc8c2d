//! Foundation types for the ldraw toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`NodeId`], [`Arena`] - Generation-checked handles and their slot storage
//! - [`Vector3`], [`Matrix4`] - Coordinates and reference transforms
//! - Text helpers (property cleanup, target-name legality, number formatting)
//! - Colour-code constants shared by the parser and the serializer
//!
//! This module has NO dependencies on other ldraw modules.

mod handle;
mod math;
pub mod text;

pub use handle::{Arena, NodeId};
pub use math::{EPSILON, Matrix4, Vector3};

/// The "main colour" code: inherit the colour of the referencing line.
pub const MAIN_COLOUR: u32 = 16;

/// The "edge colour" code: the complement of the inherited colour.
pub const EDGE_COLOUR: u32 = 24;

/// Direct colours are written as `0x2RRGGBB`.
pub const DIRECT_COLOUR_FLAG: u32 = 0x0200_0000;

/// Check whether `code` is an opaque direct RGB colour.
pub fn is_direct_colour(code: u32) -> bool {
    code & 0xFF00_0000 == DIRECT_COLOUR_FLAG
}

/// LDraw line terminator, used for every emitted line.
pub const CRLF: &str = "\r\n";

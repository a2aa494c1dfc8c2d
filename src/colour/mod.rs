//! Colours, materials and the system palette.
//!
//! A [`ColourTable`] maps codes to [`ColourEntry`] values. The process-wide
//! [`Palette`] provides the default table; documents shadow it locally with
//! `!COLOUR` meta-commands (see [`Document::colour_table`](crate::dom::Document::colour_table)).

mod entry;
mod material;
mod palette;
mod table;

pub use entry::{ColourEntry, Edge, Rgba, format_colour_code, parse_colour_code};
pub use material::Material;
pub use palette::{DEFAULT_LDCONFIG, Palette, PaletteListener, PaletteSubscription, parse_ldconfig};
pub use table::ColourTable;

//! Colour entries: one `!COLOUR` definition each.

use std::fmt;

use super::Material;
use crate::base::is_direct_colour;
use crate::core::{Error, Result, Subject};

/// An RGB value with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `0x2RRGGBB`.
    pub fn parse(token: &str) -> Result<Self, String> {
        let hex = token
            .strip_prefix('#')
            .or_else(|| token.strip_prefix("0x2"))
            .or_else(|| token.strip_prefix("0X2"))
            .ok_or_else(|| format!("invalid colour value '{token}'"))?;
        if hex.len() != 6 {
            return Err(format!("invalid colour value '{token}'"));
        }
        let rgb =
            u32::from_str_radix(hex, 16).map_err(|_| format!("invalid colour value '{token}'"))?;
        Ok(Self::opaque((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 255
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The `EDGE` attribute: either a literal value or another colour code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Value(Rgba),
    Code(u32),
}

impl Edge {
    fn parse(token: &str) -> Result<Self, String> {
        if token.starts_with('#') || token.starts_with("0x") || token.starts_with("0X") {
            Rgba::parse(token).map(Self::Value)
        } else {
            parse_colour_code(token).map(Self::Code)
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(rgba) => rgba.fmt(f),
            Self::Code(code) => f.write_str(&format_colour_code(*code)),
        }
    }
}

/// Parse a colour code: decimal, or `0x`-prefixed hexadecimal for direct colours.
pub fn parse_colour_code(token: &str) -> Result<u32, String> {
    let parsed = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = token.strip_prefix('#') {
        u32::from_str_radix(hex, 16)
    } else {
        token.parse::<u32>()
    };
    parsed.map_err(|_| format!("invalid colour code '{token}'"))
}

/// Format a colour code: `0x2RRGGBB` for direct colours, decimal otherwise.
pub fn format_colour_code(code: u32) -> String {
    if is_direct_colour(code) {
        format!("0x{code:07X}")
    } else {
        code.to_string()
    }
}

/// A colour definition: code, name, value, edge, luminance and material.
///
/// Entries carry two independent mutability gates: `frozen` (irreversible)
/// and `locked` (reversible). Setters check them in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourEntry {
    code: u32,
    name: String,
    value: Rgba,
    edge: Edge,
    luminance: Option<u8>,
    material: Material,
    frozen: bool,
    locked: bool,
}

impl ColourEntry {
    pub fn new(code: u32, name: impl Into<String>, value: Rgba, edge: Edge) -> Self {
        Self {
            code,
            name: name.into(),
            value,
            edge,
            luminance: None,
            material: Material::Plastic,
            frozen: false,
            locked: false,
        }
    }

    /// Parse the payload of a `!COLOUR` line (everything after the keyword).
    pub fn parse_definition(payload: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = payload.split_whitespace().collect();
        let [name, "CODE", code, "VALUE", value, "EDGE", edge, rest @ ..] = tokens.as_slice()
        else {
            return Err(format!("malformed colour definition '{}'", payload.trim()));
        };
        let mut entry = Self::new(
            parse_colour_code(code)?,
            *name,
            Rgba::parse(value)?,
            Edge::parse(edge)?,
        );

        let mut rest = rest;
        loop {
            match rest {
                ["ALPHA", alpha, tail @ ..] => {
                    let alpha = alpha
                        .parse::<u8>()
                        .map_err(|_| format!("invalid ALPHA '{alpha}'"))?;
                    entry.value = entry.value.with_alpha(alpha);
                    rest = tail;
                }
                ["LUMINANCE", luminance, tail @ ..] => {
                    entry.luminance = Some(
                        luminance
                            .parse::<u8>()
                            .map_err(|_| format!("invalid LUMINANCE '{luminance}'"))?,
                    );
                    rest = tail;
                }
                _ => break,
            }
        }
        entry.material = Material::parse(rest)?;
        Ok(entry)
    }

    /// The definition text without the leading `0 `.
    pub fn definition(&self) -> String {
        let mut out = format!(
            "!COLOUR {} CODE {} VALUE {} EDGE {}",
            self.name,
            format_colour_code(self.code),
            self.value,
            self.edge
        );
        if self.value.is_transparent() {
            out.push_str(&format!(" ALPHA {}", self.value.a));
        }
        if let Some(luminance) = self.luminance {
            out.push_str(&format!(" LUMINANCE {luminance}"));
        }
        let material = self.material.token();
        if !material.is_empty() {
            out.push(' ');
            out.push_str(&material);
        }
        out
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Rgba {
        self.value
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn luminance(&self) -> Option<u8> {
        self.luminance
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Irreversibly freeze the entry.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn lock(&mut self) -> Result<()> {
        self.check_frozen()?;
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) -> Result<()> {
        self.check_frozen()?;
        self.locked = false;
        Ok(())
    }

    fn check_frozen(&self) -> Result<()> {
        if self.frozen {
            return Err(Error::Frozen(Subject::Colour(self.code)));
        }
        Ok(())
    }

    fn check_mutable(&self) -> Result<()> {
        self.check_frozen()?;
        if self.locked {
            return Err(Error::Locked(Subject::Colour(self.code)));
        }
        Ok(())
    }

    pub fn set_code(&mut self, code: u32) -> Result<()> {
        self.check_mutable()?;
        self.code = code;
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.check_mutable()?;
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::invalid(format!("'{name}' is not a valid colour name")));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_value(&mut self, value: Rgba) -> Result<()> {
        self.check_mutable()?;
        self.value = value;
        Ok(())
    }

    pub fn set_edge(&mut self, edge: Edge) -> Result<()> {
        self.check_mutable()?;
        self.edge = edge;
        Ok(())
    }

    pub fn set_luminance(&mut self, luminance: Option<u8>) -> Result<()> {
        self.check_mutable()?;
        self.luminance = luminance;
        Ok(())
    }

    pub fn set_material(&mut self, material: Material) -> Result<()> {
        self.check_mutable()?;
        self.material = material;
        Ok(())
    }
}

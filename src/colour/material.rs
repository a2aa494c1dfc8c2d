//! Surface materials attached to colour definitions.

use std::fmt;

/// Finish of a colour, as written at the end of a `!COLOUR` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Plastic,
    Chrome,
    Metal,
    MatteMetallic,
    Pearlescent,
    Rubber,
    /// `MATERIAL <parameters>`, kept verbatim (glitter, speckle, vendor extensions).
    Unknown(String),
}

impl Material {
    /// Recognise a material from the tokens following the colour attributes.
    ///
    /// Returns an error message for anything that is not a known token.
    pub fn parse(tokens: &[&str]) -> Result<Self, String> {
        match tokens {
            [] => Ok(Self::Plastic),
            ["CHROME"] => Ok(Self::Chrome),
            ["METAL"] => Ok(Self::Metal),
            ["MATTE_METALLIC"] => Ok(Self::MatteMetallic),
            ["PEARLESCENT"] => Ok(Self::Pearlescent),
            ["RUBBER"] => Ok(Self::Rubber),
            ["MATERIAL", rest @ ..] if !rest.is_empty() => Ok(Self::Unknown(rest.join(" "))),
            _ => Err(format!("unrecognised material '{}'", tokens.join(" "))),
        }
    }

    /// Canonical token; empty for plain plastic.
    pub fn token(&self) -> String {
        match self {
            Self::Plastic => String::new(),
            Self::Chrome => "CHROME".to_string(),
            Self::Metal => "METAL".to_string(),
            Self::MatteMetallic => "MATTE_METALLIC".to_string(),
            Self::Pearlescent => "PEARLESCENT".to_string(),
            Self::Rubber => "RUBBER".to_string(),
            Self::Unknown(raw) => format!("MATERIAL {raw}"),
        }
    }

    /// Two materials are equivalent when they are the same variant and, for
    /// unknown materials, carry the same raw parameters.
    pub fn is_equivalent(&self, other: &Material) -> bool {
        self == other
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plastic => f.write_str("plastic"),
            other => f.write_str(&other.token()),
        }
    }
}

//! Output profiles

use std::fmt;

/// The standard a document is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeStandard {
    /// Everything the model holds.
    #[default]
    Full,
    /// Models submitted to the official model repository.
    OfficialModelRepository,
    /// Parts submitted to the parts library: no instruction or grouping
    /// commands.
    PartsLibrary,
}

impl CodeStandard {
    /// True if `CLEAR`, `PAUSE`, `SAVE`, `WRITE` and MLCad groups are written.
    pub fn writes_instructions(self) -> bool {
        self != Self::PartsLibrary
    }

    /// True for the two profiles meant for publication.
    pub fn is_export(self) -> bool {
        self != Self::Full
    }
}

impl fmt::Display for CodeStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::OfficialModelRepository => "official model repository",
            Self::PartsLibrary => "parts library",
        })
    }
}

/// Winding of the surrounding geometry relative to the written text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindingDirection {
    #[default]
    Normal,
    Reversed,
}

impl WindingDirection {
    pub fn is_reversed(self) -> bool {
        self == Self::Reversed
    }

    /// The winding seen through one more inversion.
    pub fn inverted(self) -> Self {
        match self {
            Self::Normal => Self::Reversed,
            Self::Reversed => Self::Normal,
        }
    }
}

//! Pages: named, typed units of content.

use std::fmt;

use smol_str::SmolStr;

/// The `!LDRAW_ORG` type of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageType {
    #[default]
    Part,
    Subpart,
    Primitive,
    HiresPrimitive,
    Shortcut,
    Model,
    PartAlias,
    ShortcutAlias,
    PartPhysicalColour,
    ShortcutPhysicalColour,
}

impl PageType {
    /// Type token as written after `0 !LDRAW_ORG` (without `Unofficial_`).
    pub fn token(self) -> &'static str {
        match self {
            Self::Part => "Part",
            Self::Subpart => "Subpart",
            Self::Primitive => "Primitive",
            Self::HiresPrimitive => "48_Primitive",
            Self::Shortcut => "Shortcut",
            Self::Model => "Model",
            Self::PartAlias => "Part Alias",
            Self::ShortcutAlias => "Shortcut Alias",
            Self::PartPhysicalColour => "Part Physical_Colour",
            Self::ShortcutPhysicalColour => "Shortcut Physical_Colour",
        }
    }

    /// Recognise the leading words of a `!LDRAW_ORG` payload.
    ///
    /// Returns the type, whether it was marked unofficial, and how many words
    /// were consumed.
    pub fn parse(words: &[&str]) -> Option<(Self, bool, usize)> {
        let first = words.first()?;
        let (base, unofficial) = match first.strip_prefix("Unofficial_") {
            Some(rest) => (rest, true),
            None => (*first, false),
        };
        let qualifier = words.get(1).copied().unwrap_or("");
        let (page_type, used) = match (base.to_ascii_lowercase().as_str(), qualifier) {
            ("part", "Alias") => (Self::PartAlias, 2),
            ("part", "Physical_Colour") => (Self::PartPhysicalColour, 2),
            ("shortcut", "Alias") => (Self::ShortcutAlias, 2),
            ("shortcut", "Physical_Colour") => (Self::ShortcutPhysicalColour, 2),
            ("part", _) => (Self::Part, 1),
            ("subpart", _) => (Self::Subpart, 1),
            ("primitive", _) => (Self::Primitive, 1),
            ("48_primitive", _) => (Self::HiresPrimitive, 1),
            ("shortcut", _) => (Self::Shortcut, 1),
            ("model", _) => (Self::Model, 1),
            _ => return None,
        };
        Some((page_type, unofficial, used))
    }

    /// Default type for a file name: `.ldr`/`.mpd` are models, the rest parts.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".ldr") || lower.ends_with(".mpd") {
            Self::Model
        } else {
            Self::Part
        }
    }

    pub fn is_alias(self) -> bool {
        matches!(self, Self::PartAlias | Self::ShortcutAlias)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Back-face-culling certification declared in the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BfcCertification {
    #[default]
    NotSpecified,
    CertifiedCounterClockwise,
    CertifiedClockwise,
    NotCertified,
}

impl BfcCertification {
    /// Header payload after `0 BFC `, or `None` when not specified.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::NotSpecified => None,
            Self::CertifiedCounterClockwise => Some("CERTIFY CCW"),
            Self::CertifiedClockwise => Some("CERTIFY CW"),
            Self::NotCertified => Some("NOCERTIFY"),
        }
    }

    pub fn is_certified(self) -> bool {
        matches!(
            self,
            Self::CertifiedClockwise | Self::CertifiedCounterClockwise
        )
    }
}

/// Page attributes. Steps are held as child nodes of the page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub(crate) target_name: SmolStr,
    pub(crate) title: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) page_type: PageType,
    pub(crate) unofficial: bool,
    pub(crate) update: Option<String>,
    pub(crate) license: Option<String>,
    pub(crate) help: Vec<String>,
    pub(crate) bfc: BfcCertification,
    pub(crate) category: Option<String>,
    pub(crate) keywords: Vec<String>,
    pub(crate) command_line: Option<String>,
    pub(crate) history: Vec<String>,
}

impl Page {
    /// A page named `target_name`, typed from its extension.
    pub fn new(target_name: impl Into<SmolStr>) -> Self {
        let target_name = target_name.into();
        Self {
            page_type: PageType::from_file_name(&target_name),
            target_name,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = crate::base::text::clean_text(title);
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = crate::base::text::clean_text(author);
        self
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_bfc(mut self, bfc: BfcCertification) -> Self {
        self.bfc = bfc;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = crate::base::text::clean_text(category);
        self
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn is_unofficial(&self) -> bool {
        self.unofficial
    }

    pub fn update(&self) -> Option<&str> {
        self.update.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn help(&self) -> &[String] {
        &self.help
    }

    pub fn bfc(&self) -> BfcCertification {
        self.bfc
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn command_line(&self) -> Option<&str> {
        self.command_line.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// A `~Moved to` placeholder left behind when a part is renumbered.
    pub fn is_redirect(&self) -> bool {
        self.title.as_deref().is_some_and(|title| {
            title
                .get(..9)
                .is_some_and(|head| head.eq_ignore_ascii_case("~Moved to"))
        })
    }
}

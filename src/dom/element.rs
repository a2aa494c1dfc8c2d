//! Element variants: the atomic content of a step.

use std::fmt;

use smol_str::SmolStr;

use super::reference::Target;
use crate::base::{Matrix4, NodeId, Vector3, text::clean_text};
use crate::colour::ColourEntry;

/// A plain comment, stored without the leading `0 `.
///
/// An empty comment represents a blank line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub fn new(text: &str) -> Self {
        Self {
            text: clean_text(text).unwrap_or_default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// True if the text starts with the `//` comment marker.
    pub fn has_prefix(&self) -> bool {
        self.text.starts_with("//")
    }
}

/// A type-1 line: a placed copy of another page.
#[derive(Debug, Clone)]
pub struct Reference {
    pub(crate) colour: u32,
    pub(crate) transform: Matrix4,
    pub(crate) target_name: SmolStr,
    pub(crate) invert: bool,
    pub(crate) target: Option<Target>,
}

impl Reference {
    pub fn new(colour: u32, transform: Matrix4, target_name: impl Into<SmolStr>) -> Self {
        Self {
            colour,
            transform,
            target_name: target_name.into(),
            invert: false,
            target: None,
        }
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn colour(&self) -> u32 {
        self.colour
    }

    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Set by a preceding `0 BFC INVERTNEXT`.
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// The cached target link, if the reference was resolved.
    pub fn cached_target(&self) -> Option<&Target> {
        self.target.as_ref()
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.colour == other.colour
            && self.transform == other.transform
            && self.target_name == other.target_name
            && self.invert == other.invert
    }
}

/// Geometric primitive kinds, by LDraw line type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Line,
    Triangle,
    Quadrilateral,
    OptionalLine,
}

impl Primitive {
    /// Line-type code (2–5).
    pub fn line_type(self) -> u8 {
        match self {
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quadrilateral => 4,
            Self::OptionalLine => 5,
        }
    }

    pub fn from_line_type(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Line),
            3 => Some(Self::Triangle),
            4 => Some(Self::Quadrilateral),
            5 => Some(Self::OptionalLine),
            _ => None,
        }
    }

    /// Number of coordinate triples on the line (control points included).
    pub fn vertex_count(self) -> usize {
        match self {
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quadrilateral | Self::OptionalLine => 4,
        }
    }
}

/// Lines, triangles, quadrilaterals and optional lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub(crate) primitive: Primitive,
    pub(crate) colour: u32,
    pub(crate) vertices: Vec<Vector3>,
}

impl Graphic {
    /// Build a primitive; `vertices` must hold exactly
    /// [`Primitive::vertex_count`] points.
    pub fn new(primitive: Primitive, colour: u32, vertices: Vec<Vector3>) -> Option<Self> {
        (vertices.len() == primitive.vertex_count()).then_some(Self {
            primitive,
            colour,
            vertices,
        })
    }

    pub fn line(colour: u32, a: Vector3, b: Vector3) -> Self {
        Self {
            primitive: Primitive::Line,
            colour,
            vertices: vec![a, b],
        }
    }

    pub fn triangle(colour: u32, a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self {
            primitive: Primitive::Triangle,
            colour,
            vertices: vec![a, b, c],
        }
    }

    pub fn quadrilateral(colour: u32, a: Vector3, b: Vector3, c: Vector3, d: Vector3) -> Self {
        Self {
            primitive: Primitive::Quadrilateral,
            colour,
            vertices: vec![a, b, c, d],
        }
    }

    /// An optional line from `a` to `b` with control points `c1` and `c2`.
    pub fn optional_line(colour: u32, a: Vector3, b: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self {
            primitive: Primitive::OptionalLine,
            colour,
            vertices: vec![a, b, c1, c2],
        }
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn colour(&self) -> u32 {
        self.colour
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    /// True if two of the drawn vertices coincide, or a triangle's are collinear.
    pub fn is_degenerate(&self) -> bool {
        let drawn = match self.primitive {
            Primitive::OptionalLine => &self.vertices[..2],
            _ => &self.vertices[..],
        };
        for (i, a) in drawn.iter().enumerate() {
            if drawn[i + 1..].iter().any(|b| a.approx_eq(*b)) {
                return true;
            }
        }
        if self.primitive == Primitive::Triangle {
            let n = drawn[1].sub(drawn[0]).cross(drawn[2].sub(drawn[0]));
            return n.length() < crate::base::EPSILON;
        }
        false
    }
}

/// The six `0 BFC` state commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BfcFlag {
    SetWindingModeClockwise,
    SetWindingModeCounterClockwise,
    EnableBackFaceCulling,
    DisableBackFaceCulling,
    EnableBackFaceCullingAndSetWindingModeClockwise,
    EnableBackFaceCullingAndSetWindingModeCounterClockwise,
}

impl BfcFlag {
    /// Canonical payload following `0 BFC `.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::SetWindingModeClockwise => "CW",
            Self::SetWindingModeCounterClockwise => "CCW",
            Self::EnableBackFaceCulling => "CLIP",
            Self::DisableBackFaceCulling => "NOCLIP",
            Self::EnableBackFaceCullingAndSetWindingModeClockwise => "CLIP CW",
            Self::EnableBackFaceCullingAndSetWindingModeCounterClockwise => "CLIP CCW",
        }
    }

    /// The same command with CW and CCW exchanged.
    pub fn reversed(self) -> Self {
        match self {
            Self::SetWindingModeClockwise => Self::SetWindingModeCounterClockwise,
            Self::SetWindingModeCounterClockwise => Self::SetWindingModeClockwise,
            Self::EnableBackFaceCullingAndSetWindingModeClockwise => {
                Self::EnableBackFaceCullingAndSetWindingModeCounterClockwise
            }
            Self::EnableBackFaceCullingAndSetWindingModeCounterClockwise => {
                Self::EnableBackFaceCullingAndSetWindingModeClockwise
            }
            other => other,
        }
    }
}

impl fmt::Display for BfcFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A `0 WRITE` (or `0 PRINT`) message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Write {
    pub(crate) text: Option<String>,
}

impl Write {
    pub fn new(text: &str) -> Self {
        Self {
            text: clean_text(text),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// An MLCad group declaration (`0 GROUP <count> <name>`).
///
/// Members are elements of the same page that joined the group; they are not
/// structural children.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) members: Vec<NodeId>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }
}

/// `!TEXMAP START` opens a block; `!TEXMAP NEXT` applies to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexmapMode {
    Start,
    Next,
}

/// Texture projection and its extra parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Planar,
    Cylindrical { angle: f64 },
    Spherical { angle1: f64, angle2: f64 },
}

impl Projection {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Planar => "PLANAR",
            Self::Cylindrical { .. } => "CYLINDRICAL",
            Self::Spherical { .. } => "SPHERICAL",
        }
    }

    /// Numbers written after the three projection points.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Planar => Vec::new(),
            Self::Cylindrical { angle } => vec![*angle],
            Self::Spherical { angle1, angle2 } => vec![*angle1, *angle2],
        }
    }
}

/// Where a texmap child is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TexmapSection {
    /// `0 !:` lines: drawn only by texmap-aware renderers.
    Texture,
    /// Plain lines inside the block: drawn by everyone, textured when supported.
    #[default]
    Shared,
    /// Lines after `!TEXMAP FALLBACK`: drawn only without texmap support.
    Fallback,
}

/// A `!TEXMAP` block. Its geometry is held as child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Texmap {
    pub(crate) mode: TexmapMode,
    pub(crate) projection: Projection,
    pub(crate) points: [Vector3; 3],
    pub(crate) texture: String,
    pub(crate) glossmap: Option<String>,
}

impl Texmap {
    pub fn new(
        mode: TexmapMode,
        projection: Projection,
        points: [Vector3; 3],
        texture: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            projection,
            points,
            texture: texture.into(),
            glossmap: None,
        }
    }

    pub fn with_glossmap(mut self, glossmap: impl Into<String>) -> Self {
        self.glossmap = Some(glossmap.into());
        self
    }

    pub fn mode(&self) -> TexmapMode {
        self.mode
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn points(&self) -> &[Vector3; 3] {
        &self.points
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn glossmap(&self) -> Option<&str> {
        self.glossmap.as_deref()
    }
}

/// The content variants of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Comment(Comment),
    Reference(Reference),
    Graphic(Graphic),
    Texmap(Texmap),
    BfcFlag(BfcFlag),
    Clear,
    Pause,
    Save,
    Write(Write),
    Colour(ColourEntry),
    Group(Group),
}

impl ElementKind {
    pub fn comment(text: &str) -> Self {
        Self::Comment(Comment::new(text))
    }

    pub fn write(text: &str) -> Self {
        Self::Write(Write::new(text))
    }

    pub fn group(name: &str) -> Self {
        Self::Group(Group::new(name))
    }

    /// Short name used in logs and problem reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Comment(_) => "comment",
            Self::Reference(_) => "reference",
            Self::Graphic(g) => match g.primitive {
                Primitive::Line => "line",
                Primitive::Triangle => "triangle",
                Primitive::Quadrilateral => "quadrilateral",
                Primitive::OptionalLine => "optional line",
            },
            Self::Texmap(_) => "texmap",
            Self::BfcFlag(_) => "BFC flag",
            Self::Clear => "clear",
            Self::Pause => "pause",
            Self::Save => "save",
            Self::Write(_) => "write",
            Self::Colour(_) => "colour",
            Self::Group(_) => "group",
        }
    }

    /// Affects rendering state without producing geometry.
    pub fn is_state_element(&self) -> bool {
        matches!(self, Self::BfcFlag(_) | Self::Colour(_) | Self::Clear)
    }

    /// May only appear directly in a step, never inside a texmap.
    pub fn is_top_level_element(&self) -> bool {
        matches!(
            self,
            Self::Texmap(_)
                | Self::Colour(_)
                | Self::Clear
                | Self::Pause
                | Self::Save
                | Self::Write(_)
                | Self::Group(_)
        )
    }

    /// May join a [`Group`].
    pub fn is_groupable(&self) -> bool {
        matches!(self, Self::Reference(_) | Self::Graphic(_) | Self::Group(_))
    }

    /// Colour code for references and graphics.
    pub fn colour_code(&self) -> Option<u32> {
        match self {
            Self::Reference(r) => Some(r.colour),
            Self::Graphic(g) => Some(g.colour),
            _ => None,
        }
    }
}

/// An element node's payload: its kind plus relations managed by the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) kind: ElementKind,
    pub(crate) group: Option<NodeId>,
    pub(crate) section: Option<TexmapSection>,
}

impl Element {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            group: None,
            section: None,
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// The group this element belongs to.
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    /// The texmap section, when the element is a texmap child.
    pub fn texmap_section(&self) -> Option<TexmapSection> {
        self.section
    }

    pub fn is_state_element(&self) -> bool {
        self.kind.is_state_element()
    }

    pub fn is_top_level_element(&self) -> bool {
        self.kind.is_top_level_element()
    }

    pub fn is_groupable(&self) -> bool {
        self.kind.is_groupable()
    }
}

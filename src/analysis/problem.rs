//! Problem reports and their fixes.

use std::fmt;
use std::sync::Arc;

use crate::base::NodeId;

// ============================================================================
// PROBLEM TYPES
// ============================================================================

/// How serious a problem is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// What applying a [`Fix`] does to its node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FixAction {
    /// Remove the node from its container and dispose it.
    Remove,
    /// Put `// ` in front of a comment's text.
    PrefixComment,
    /// Set the colour of a reference or graphic.
    SetColour(u32),
}

/// A mechanical repair for a [`Problem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fix {
    pub node: NodeId,
    pub action: FixAction,
    pub description: Arc<str>,
}

impl Fix {
    pub fn remove(node: NodeId, what: &str) -> Self {
        Self {
            node,
            action: FixAction::Remove,
            description: Arc::from(format!("remove the {what}")),
        }
    }

    pub fn prefix_comment(node: NodeId) -> Self {
        Self {
            node,
            action: FixAction::PrefixComment,
            description: Arc::from("insert the '//' comment marker"),
        }
    }

    pub fn set_colour(node: NodeId, code: u32) -> Self {
        Self {
            node,
            action: FixAction::SetColour(code),
            description: Arc::from(format!("change the colour to {code}")),
        }
    }
}

/// A lint report against one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    /// Stable identifier, see [`codes`].
    pub code: &'static str,
    pub severity: Severity,
    /// The element or page the problem was found on.
    pub element: NodeId,
    pub description: Arc<str>,
    pub fixes: Vec<Fix>,
}

impl Problem {
    pub fn new(
        code: &'static str,
        severity: Severity,
        element: NodeId,
        description: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            code,
            severity,
            element,
            description: description.into(),
            fixes: Vec::new(),
        }
    }

    pub fn error(code: &'static str, element: NodeId, description: impl Into<Arc<str>>) -> Self {
        Self::new(code, Severity::Error, element, description)
    }

    pub fn warning(code: &'static str, element: NodeId, description: impl Into<Arc<str>>) -> Self {
        Self::new(code, Severity::Warning, element, description)
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}: {}", self.severity, self.code, self.element, self.description)
    }
}

// ============================================================================
// PROBLEM CODES
// ============================================================================

/// Problem codes.
///
/// - **E0001-E0099**: errors
/// - **W0001-W0099**: warnings; a few are raised to errors by the export
///   profiles
pub mod codes {
    /// Lines or triangles without area, or coincident vertices.
    pub const DEGENERATE_GEOMETRY: &str = "E0001";
    /// A reference transform that flattens its target.
    pub const SINGULAR_TRANSFORM: &str = "E0002";
    /// `!COLOUR` definitions are not allowed in library parts.
    pub const COLOUR_DEFINITION: &str = "E0003";
    /// Library parts must name an author.
    pub const MISSING_AUTHOR: &str = "E0004";

    /// Comment without the `//` marker.
    pub const MISSING_COMMENT_MARKER: &str = "W0001";
    /// Instruction or grouping command in a library part.
    pub const INSTRUCTION_COMMAND: &str = "W0002";
    /// Edge lines should use colour 24.
    pub const LINE_COLOUR: &str = "W0003";
    /// Reference to a page that could not be found.
    pub const UNRESOLVED_REFERENCE: &str = "W0004";
    /// Library parts should declare a BFC certification.
    pub const MISSING_BFC_CERTIFICATION: &str = "W0005";
}

// ============================================================================
// PROBLEM COLLECTOR
// ============================================================================

/// Collects problems during a walk.
#[derive(Clone, Debug, Default)]
pub struct ProblemCollector {
    problems: Vec<Problem>,
}

impl ProblemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, problem: Problem) {
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn error_count(&self) -> usize {
        self.problems.iter().filter(|p| p.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(Problem::is_error)
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

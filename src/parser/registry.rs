//! Meta-command registry
//!
//! Maps `0 <payload>` lines to element kinds. Each command has a name, one or
//! more regex patterns and a builder that turns the captures into an
//! [`ElementKind`]. Commands are tried in declaration order and the first
//! matching pattern wins, so more specific commands must be registered first.
//!
//! The standard table covers:
//! 1. `BFC` winding and culling flags
//! 2. `CLEAR`, `PAUSE`, `SAVE`
//! 3. `WRITE` / `PRINT`
//! 4. `!COLOUR` definitions
//! 5. MLCad `GROUP` declarations

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use smol_str::SmolStr;

use crate::colour::ColourEntry;
use crate::core::{Error, Result};
use crate::dom::{BfcFlag, ElementKind};

/// Outcome of building an element from a match.
pub type BuildResult = std::result::Result<ElementKind, String>;

/// Turns a pattern match into an element.
pub type MetaBuilder = Arc<dyn Fn(&Captures<'_>) -> BuildResult + Send + Sync>;

type StandardCommand = (&'static str, &'static str, fn(&Captures<'_>) -> BuildResult);

/// Standard commands, in match order.
const STANDARD_COMMANDS: &[StandardCommand] = &[
    (
        "BFC",
        r"^BFC\s+(?P<flag>CLIP\s+CW|CLIP\s+CCW|CW\s+CLIP|CCW\s+CLIP|CW|CCW|CLIP|NOCLIP)\s*$",
        build_bfc,
    ),
    ("CLEAR", r"^CLEAR\s*$", |_| Ok(ElementKind::Clear)),
    ("PAUSE", r"^PAUSE\s*$", |_| Ok(ElementKind::Pause)),
    ("SAVE", r"^SAVE\s*$", |_| Ok(ElementKind::Save)),
    ("WRITE", r"^(?:WRITE|PRINT)(?:\s+(?P<text>.*))?$", build_write),
    ("!COLOUR", r"^!COLOUR\s+(?P<definition>.+)$", build_colour),
    ("GROUP", r"^GROUP\s+(?P<count>[0-9]+)\s+(?P<name>\S.*)$", build_group),
];

static STANDARD: Lazy<Arc<MetaCommandRegistry>> = Lazy::new(|| {
    let mut registry = MetaCommandRegistry::new();
    for (name, pattern, build) in STANDARD_COMMANDS {
        if let Err(err) = registry.register(name, &[*pattern], *build) {
            tracing::error!(command = *name, %err, "invalid standard meta-command pattern");
        }
    }
    Arc::new(registry)
});

fn capture<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn build_bfc(caps: &Captures<'_>) -> BuildResult {
    let words: Vec<&str> = capture(caps, "flag").split_whitespace().collect();
    let flag = match words.as_slice() {
        ["CW"] => BfcFlag::SetWindingModeClockwise,
        ["CCW"] => BfcFlag::SetWindingModeCounterClockwise,
        ["CLIP"] => BfcFlag::EnableBackFaceCulling,
        ["NOCLIP"] => BfcFlag::DisableBackFaceCulling,
        ["CLIP", "CW"] | ["CW", "CLIP"] => BfcFlag::EnableBackFaceCullingAndSetWindingModeClockwise,
        ["CLIP", "CCW"] | ["CCW", "CLIP"] => {
            BfcFlag::EnableBackFaceCullingAndSetWindingModeCounterClockwise
        }
        other => return Err(format!("unknown BFC command '{}'", other.join(" "))),
    };
    Ok(ElementKind::BfcFlag(flag))
}

fn build_write(caps: &Captures<'_>) -> BuildResult {
    Ok(ElementKind::write(capture(caps, "text")))
}

fn build_colour(caps: &Captures<'_>) -> BuildResult {
    ColourEntry::parse_definition(capture(caps, "definition")).map(ElementKind::Colour)
}

fn build_group(caps: &Captures<'_>) -> BuildResult {
    Ok(ElementKind::group(capture(caps, "name")))
}

struct MetaCommand {
    patterns: Vec<Regex>,
    build: MetaBuilder,
}

/// A recognised meta-command line.
#[derive(Debug)]
pub struct Recognised {
    /// Name of the command that matched.
    pub command: SmolStr,
    /// The built element, or the reason the payload was rejected.
    pub result: BuildResult,
}

/// Ordered table of meta-commands.
#[derive(Clone, Default)]
pub struct MetaCommandRegistry {
    commands: IndexMap<SmolStr, Arc<MetaCommand>>,
}

impl MetaCommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared standard registry.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Register `name`, or replace it in place if it already exists.
    pub fn register(
        &mut self,
        name: &str,
        patterns: &[&str],
        build: impl Fn(&Captures<'_>) -> BuildResult + Send + Sync + 'static,
    ) -> Result<()> {
        let build: MetaBuilder = Arc::new(build);
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| Error::invalid(format!("meta-command '{name}': {err}")))?;
        self.commands
            .insert(SmolStr::new(name), Arc::new(MetaCommand { patterns, build }));
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.shift_remove(name).is_some()
    }

    /// Match `payload` (the text after `0 `) against the registered commands.
    pub fn recognise(&self, payload: &str) -> Option<Recognised> {
        for (name, command) in &self.commands {
            if let Some(caps) = command.patterns.iter().find_map(|p| p.captures(payload)) {
                return Some(Recognised {
                    command: name.clone(),
                    result: (command.build)(&caps),
                });
            }
        }
        None
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(SmolStr::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for MetaCommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

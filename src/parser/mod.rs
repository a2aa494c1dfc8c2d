//! LDraw text → document tree
//!
//! ## Pipeline
//!
//! ```text
//! Source text
//!     ↓
//! Page splitting (`0 FILE` / `0 NOFILE`)
//!     ↓
//! Lexer (logos) → fields per line
//!     ↓
//! PageBuilder → header, steps, elements (geometry, registry meta-commands)
//!     ↓
//! Page naming → illegal names corrected, duplicates suffixed
//!     ↓
//! Redirects → x-series, moved-to, aliases
//!     ↓
//! Target resolution → cycle check → freeze / read-only
//! ```
//!
//! Malformed geometry and rejected meta-command payloads abort the parse with
//! a format error; unrecognised lines become comments.

mod geometry;
mod lexer;
mod page;
mod registry;
mod resolve;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, trace, warn};

pub use lexer::{Field, FieldKind, fields};
pub use registry::{BuildResult, MetaBuilder, MetaCommandRegistry, Recognised};

use self::lexer::rest_of_line;
use self::page::PageBuilder;
use crate::core::Result;
use crate::dom::{Document, NoResolver, PageResolver};

static NO_RESOLVER: NoResolver = NoResolver;

/// Options controlling optional parser behaviour.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Follow `~Moved to` pages to their new target.
    pub follow_redirects: bool,
    /// Follow alias pages to the page they stand for.
    pub follow_aliases: bool,
    /// Fail on pages that reach themselves through references.
    pub check_circular_references: bool,
    /// Freeze the whole document after loading.
    pub freeze: bool,
    /// Mark the document read-only after loading.
    pub read_only: bool,
    /// Meta-command table used to classify `0` lines.
    pub registry: Arc<MetaCommandRegistry>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            follow_aliases: true,
            check_circular_references: true,
            freeze: false,
            read_only: false,
            registry: MetaCommandRegistry::standard(),
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_follow_aliases(mut self, follow: bool) -> Self {
        self.follow_aliases = follow;
        self
    }

    pub fn with_circular_reference_check(mut self, check: bool) -> Self {
        self.check_circular_references = check;
        self
    }

    pub fn with_freeze(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_registry(mut self, registry: Arc<MetaCommandRegistry>) -> Self {
        self.registry = registry;
        self
    }
}

/// A successfully parsed document.
#[derive(Debug)]
pub struct ParsedDocument {
    pub document: Document,
    /// True if loading rewrote content (redirects, aliases, page names), so
    /// re-serializing will not reproduce the source.
    pub document_modified: bool,
}

/// Result of a load that may be cancelled through the progress callback.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(ParsedDocument),
    Cancelled,
}

impl LoadOutcome {
    pub fn loaded(self) -> Option<ParsedDocument> {
        match self {
            Self::Loaded(parsed) => Some(parsed),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Progress callback: receives a phase label and a percentage, returns false
/// to cancel.
pub type Progress<'a> = Box<dyn FnMut(&str, u32) -> bool + 'a>;

/// Lines of one page before it is built.
struct Section<'t> {
    name: SmolStr,
    lines: Vec<(usize, &'t str)>,
}

/// Split the source at `0 FILE` / `0 NOFILE`.
///
/// Returns the sections and whether any `0 FILE` marker was present.
fn split_pages<'t>(text: &'t str, implicit_name: &str) -> (Vec<Section<'t>>, bool) {
    let mut sections: Vec<Section<'t>> = Vec::new();
    let mut open = false;
    let mut multi_page = false;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let parsed = fields(line);
        let marker = match parsed.as_slice() {
            [zero, file, ..] if zero.text == "0" && file.text == "FILE" => {
                Some(Some(rest_of_line(line, &parsed, 2)))
            }
            [zero, nofile] if zero.text == "0" && nofile.text == "NOFILE" => Some(None),
            _ => None,
        };
        match marker {
            Some(Some(name)) => {
                debug!(line = number, page = name, "page section");
                multi_page = true;
                open = true;
                sections.push(Section {
                    name: SmolStr::new(name),
                    lines: Vec::new(),
                });
            }
            Some(None) => open = false,
            None if open => {
                if let Some(section) = sections.last_mut() {
                    section.lines.push((number, line));
                }
            }
            None if parsed.is_empty() => {}
            None if sections.is_empty() => {
                open = true;
                sections.push(Section {
                    name: SmolStr::new(implicit_name),
                    lines: vec![(number, line)],
                });
            }
            None => trace!(line = number, "line outside any page discarded"),
        }
    }
    (sections, multi_page)
}

/// The LDraw parser.
///
/// ```ignore
/// let outcome = Parser::new(ParseOptions::default())
///     .with_resolver(&library)
///     .parse_str(text, "house.mpd")?;
/// ```
pub struct Parser<'a> {
    options: ParseOptions,
    resolver: &'a dyn PageResolver,
    progress: Option<Progress<'a>>,
}

impl fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("options", &self.options)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl<'a> Parser<'a> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            resolver: &NO_RESOLVER,
            progress: None,
        }
    }

    /// Look up pages outside the document through `resolver`.
    pub fn with_resolver(mut self, resolver: &'a dyn PageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Poll `progress` before each page; returning false cancels the load.
    pub fn with_progress(mut self, progress: impl FnMut(&str, u32) -> bool + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read a whole file. The document's source path is the absolute path.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = std::path::absolute(path.as_ref())?;
        let text = std::fs::read(&path)?;
        self.parse_text(&String::from_utf8_lossy(&text), &path.to_string_lossy())
    }

    pub fn parse_reader(&mut self, mut reader: impl Read, source_name: &str) -> Result<LoadOutcome> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_text(&String::from_utf8_lossy(&bytes), source_name)
    }

    /// Parse `text` read from `source_name`.
    ///
    /// A relative source name is made absolute against the working directory.
    pub fn parse_str(&mut self, text: &str, source_name: &str) -> Result<LoadOutcome> {
        self.parse_text(text, source_name)
    }

    fn parse_text(&mut self, text: &str, source_name: &str) -> Result<LoadOutcome> {
        let mut document = Document::new();
        if !source_name.trim().is_empty() {
            document.set_source_path(std::path::absolute(source_name)?);
        }
        let implicit_name = document.source_name();
        let error_name = Path::new(source_name)
            .file_name()
            .map_or_else(|| implicit_name.clone(), |n| n.to_string_lossy().into_owned());

        let (sections, multi_page) = split_pages(text, &implicit_name);
        let mut document_modified = false;
        let mut renamed = Vec::new();
        let total = sections.len().max(1);

        for (index, section) in sections.iter().enumerate() {
            if let Some(progress) = self.progress.as_mut() {
                let percent = u32::try_from(index * 100 / total).unwrap_or(100);
                if !progress("Parsing", percent) {
                    debug!(source = %error_name, page = index, "load cancelled");
                    return Ok(LoadOutcome::Cancelled);
                }
            }

            let name = resolve::page_name(&document, &section.name);
            if name != section.name {
                if crate::base::text::is_legal_target_name(section.name.trim()) {
                    warn!(page = %section.name, renamed = %name, "duplicate page name");
                } else {
                    debug!(page = %section.name, renamed = %name, "illegal page name corrected");
                    renamed.push((section.name.clone(), name.clone()));
                }
                document_modified = true;
            }

            let mut builder = PageBuilder::new(&mut document, &self.options.registry, &error_name, &name)?;
            for (number, line) in &section.lines {
                builder.line(*number, line)?;
            }
            let page = builder.finish()?;
            document.add(document.root(), page)?;
        }

        for (old, new) in &renamed {
            resolve::retarget(&mut document, old, new)?;
        }
        if resolve::follow_redirects(&mut document, self.resolver, &self.options)? {
            document_modified = true;
        }
        let unresolved = document.resolve_references(self.resolver);
        if self.options.check_circular_references {
            document.check_circular_references(self.resolver)?;
        }

        document.set_multi_page(multi_page);
        document.modified = document_modified;
        if self.options.read_only {
            document.set_read_only(true)?;
        }
        if self.options.freeze {
            document.freeze(document.root())?;
        }
        debug!(
            source = %error_name,
            pages = document.pages().len(),
            unresolved,
            document_modified,
            "document loaded"
        );
        Ok(LoadOutcome::Loaded(ParsedDocument {
            document,
            document_modified,
        }))
    }
}

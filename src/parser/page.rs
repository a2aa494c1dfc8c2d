//! Page content: header lines, steps and the line classifier.
//!
//! A page is built line by line. Header lines at the top fill in the page
//! attributes; the first line that is not a header line ends the header.
//! After that every line becomes an element of the current step, except for
//! the prefixes (`BFC INVERTNEXT`, `MLCAD BTG`) which apply to the next line
//! and the `!TEXMAP` commands which route geometry into a texmap block.

use smol_str::SmolStr;
use tracing::{trace, warn};

use super::geometry::{parse_geometry, parse_texmap};
use super::lexer::{Field, fields, rest_of_line};
use super::registry::MetaCommandRegistry;
use crate::base::NodeId;
use crate::base::text::clean_text;
use crate::core::{Error, Result};
use crate::dom::{
    BfcCertification, Document, ElementKind, Page, PageType, TexmapMode, TexmapSection,
};

const GEOMETRY_CODES: [&str; 5] = ["1", "2", "3", "4", "5"];

struct OpenTexmap {
    id: NodeId,
    mode: TexmapMode,
    section: TexmapSection,
    line: usize,
}

/// A `MLCAD BTG` prefix waiting for its group to be declared.
struct Membership {
    element: NodeId,
    group: SmolStr,
    line: usize,
}

/// Builds one detached page from its lines.
pub(crate) struct PageBuilder<'a> {
    doc: &'a mut Document,
    registry: &'a MetaCommandRegistry,
    source_name: &'a str,
    page: NodeId,
    step: Option<NodeId>,
    in_header: bool,
    header_lines: usize,
    /// Blank lines after the last header line, not yet known to be body.
    held_blanks: usize,
    texmap: Option<OpenTexmap>,
    invert: Option<usize>,
    group: Option<(SmolStr, usize)>,
    memberships: Vec<Membership>,
}

impl<'a> PageBuilder<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        registry: &'a MetaCommandRegistry,
        source_name: &'a str,
        name: &str,
    ) -> Result<Self> {
        let page = doc.create_page(Page::new(name).with_type(PageType::from_file_name(name)))?;
        Ok(Self {
            doc,
            registry,
            source_name,
            page,
            step: None,
            in_header: true,
            header_lines: 0,
            held_blanks: 0,
            texmap: None,
            invert: None,
            group: None,
            memberships: Vec::new(),
        })
    }

    fn format_error(&self, line: usize, message: impl Into<String>) -> Error {
        Error::format(self.source_name, line, message)
    }

    /// Feed one line (without terminator); `number` is 1-based.
    pub(crate) fn line(&mut self, number: usize, line: &str) -> Result<()> {
        let fields = fields(line);
        let Some(first) = fields.first() else {
            if self.in_header {
                if self.header_lines > 0 {
                    self.held_blanks += 1;
                }
                return Ok(());
            }
            return self.place(ElementKind::comment(""), None).map(drop);
        };

        if GEOMETRY_CODES.contains(&first.text) {
            self.end_header()?;
            let kind = parse_geometry(line, &fields).map_err(|m| self.format_error(number, m))?;
            return self.place(kind, None).map(drop);
        }
        if first.text != "0" {
            trace!(line = number, "unknown line type kept as comment");
            self.end_header()?;
            return self.place(ElementKind::comment(line.trim()), None).map(drop);
        }

        let payload = rest_of_line(line, &fields, 1);
        if payload.is_empty() {
            trace!(line = number, "bare meta line dropped");
            return Ok(());
        }
        if self.in_header {
            if self.header(payload)? {
                self.header_lines += 1;
                // Blank lines inside the header are not kept.
                self.held_blanks = 0;
                return Ok(());
            }
            self.end_header()?;
        }
        self.meta(number, line, &fields, payload)
    }

    fn meta(&mut self, number: usize, line: &str, fields: &[Field<'_>], payload: &str) -> Result<()> {
        let words: Vec<&str> = fields[1..].iter().map(|f| f.text).collect();
        match words.as_slice() {
            ["STEP"] => return self.end_step(),
            ["BFC", "INVERTNEXT"] => {
                if self.invert.replace(number).is_some() {
                    warn!(line = number, "repeated BFC INVERTNEXT");
                }
                return Ok(());
            }
            ["MLCAD", "BTG", _, ..] => {
                let name = rest_of_line(line, fields, 3);
                if let Some((previous, at)) = self.group.replace((SmolStr::new(name), number)) {
                    warn!(line = at, group = %previous, "group prefix not followed by groupable content");
                    self.insert(ElementKind::comment(&format!("MLCAD BTG {previous}")), None)?;
                }
                return Ok(());
            }
            ["!TEXMAP", ..] => return self.texmap_command(number, line, fields),
            ["!:", ..] => return self.texture_line(number, line, fields),
            _ => {}
        }

        match self.registry.recognise(payload) {
            Some(found) => {
                trace!(line = number, command = %found.command, "meta-command");
                let kind = found
                    .result
                    .map_err(|m| self.format_error(number, format!("{}: {m}", found.command)))?;
                self.place(kind, None).map(drop)
            }
            None => self.place(ElementKind::comment(payload), None).map(drop),
        }
    }

    // ========================================================================
    // Header
    // ========================================================================

    /// Leave the header; blank lines between it and the body become empty
    /// comments.
    fn end_header(&mut self) -> Result<()> {
        if !self.in_header {
            return Ok(());
        }
        self.in_header = false;
        for _ in 0..std::mem::take(&mut self.held_blanks) {
            self.place(ElementKind::comment(""), None)?;
        }
        Ok(())
    }

    fn page_data(&mut self) -> Result<&mut Page> {
        let page = self.page;
        self.doc
            .node_mut(page)?
            .page_mut()
            .ok_or_else(|| Error::invalid(format!("{page} is not a page")))
    }

    /// Apply a header line. Returns false if `payload` is not one.
    fn header(&mut self, payload: &str) -> Result<bool> {
        let (keyword, rest) = payload.split_once(char::is_whitespace).unwrap_or((payload, ""));
        let rest = rest.trim();
        let is_title = self.header_lines == 0
            && !payload.starts_with("//")
            && !payload.starts_with('!')
            && !matches!(keyword, "BFC" | "STEP" | "MLCAD")
            && self.registry.recognise(payload).is_none();
        let page = self.page_data()?;
        match keyword {
            "Name:" => {}
            "Author:" => page.author = clean_text(rest),
            "!LDRAW_ORG" => {
                let words: Vec<&str> = rest.split_whitespace().collect();
                let Some((page_type, unofficial, used)) = PageType::parse(&words) else {
                    return Ok(false);
                };
                page.page_type = page_type;
                page.unofficial = unofficial;
                page.update = clean_text(&words[used..].join(" "));
            }
            "!LICENSE" => page.license = clean_text(rest),
            "!HELP" => page.help.extend(clean_text(rest)),
            "!CATEGORY" => page.category = clean_text(rest),
            "!KEYWORDS" => page.keywords.extend(
                rest.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from),
            ),
            "!CMDLINE" => page.command_line = clean_text(rest),
            "!HISTORY" => page.history.extend(clean_text(rest)),
            "BFC" => {
                let words: Vec<&str> = rest.split_whitespace().collect();
                page.bfc = match words.as_slice() {
                    ["CERTIFY"] | ["CERTIFY", "CCW"] => BfcCertification::CertifiedCounterClockwise,
                    ["CERTIFY", "CW"] => BfcCertification::CertifiedClockwise,
                    ["NOCERTIFY"] => BfcCertification::NotCertified,
                    _ => return Ok(false),
                };
            }
            _ if is_title => page.title = clean_text(payload),
            _ => return Ok(false),
        }
        Ok(true)
    }

    // ========================================================================
    // Placement
    // ========================================================================

    fn current_step(&mut self) -> Result<NodeId> {
        if let Some(step) = self.step {
            return Ok(step);
        }
        let step = self.doc.create_step()?;
        self.doc.add(self.page, step)?;
        self.step = Some(step);
        Ok(step)
    }

    /// Place an element, consuming the pending prefixes it can take.
    fn place(&mut self, kind: ElementKind, section: Option<TexmapSection>) -> Result<NodeId> {
        let kind = match kind {
            ElementKind::Reference(reference) if self.invert.take().is_some() => {
                ElementKind::Reference(reference.with_invert(true))
            }
            other => other,
        };
        if let Some(line) = self.invert.take() {
            warn!(line, "BFC INVERTNEXT not followed by a reference");
            self.insert(ElementKind::comment("BFC INVERTNEXT"), None)?;
        }
        if !kind.is_groupable() {
            if let Some((name, line)) = self.group.take() {
                warn!(line, group = %name, "group prefix not followed by groupable content");
                self.insert(ElementKind::comment(&format!("MLCAD BTG {name}")), None)?;
            }
        }

        let id = self.insert(kind, section)?;
        if let Some((group, line)) = self.group.take() {
            self.memberships.push(Membership {
                element: id,
                group,
                line,
            });
        }
        Ok(id)
    }

    /// Attach to the open texmap if the element may live there, else to the
    /// current step.
    fn insert(&mut self, kind: ElementKind, section: Option<TexmapSection>) -> Result<NodeId> {
        let top_level = kind.is_top_level_element();
        let id = self.doc.create_element(kind)?;
        let open = self
            .texmap
            .as_ref()
            .map(|o| (o.id, section.unwrap_or(o.section), o.mode, o.line));
        // A NEXT block ends with whatever element follows it.
        if open.is_some_and(|(_, _, mode, _)| mode == TexmapMode::Next) {
            self.texmap = None;
        }
        let target = match open {
            Some((texmap, section, _, _)) if !top_level => Some((texmap, section)),
            Some((_, _, _, line)) => {
                warn!(texmap_line = line, "top-level element inside a texmap block placed after it");
                None
            }
            None => None,
        };
        match target {
            Some((texmap, section)) => self.doc.add_to_texmap(texmap, section, id)?,
            None => {
                let step = self.current_step()?;
                self.doc.add(step, id)?;
            }
        }
        Ok(id)
    }

    fn flush_prefixes(&mut self) -> Result<()> {
        if let Some(line) = self.invert.take() {
            warn!(line, "dangling BFC INVERTNEXT");
            self.insert(ElementKind::comment("BFC INVERTNEXT"), None)?;
        }
        if let Some((name, line)) = self.group.take() {
            warn!(line, group = %name, "dangling group prefix");
            self.insert(ElementKind::comment(&format!("MLCAD BTG {name}")), None)?;
        }
        Ok(())
    }

    fn close_texmap(&mut self) {
        if let Some(open) = self.texmap.take() {
            warn!(line = open.line, "unterminated texmap block");
        }
    }

    fn end_step(&mut self) -> Result<()> {
        self.flush_prefixes()?;
        self.close_texmap();
        self.current_step()?;
        let next = self.doc.create_step()?;
        self.doc.add(self.page, next)?;
        self.step = Some(next);
        Ok(())
    }

    // ========================================================================
    // Texmaps
    // ========================================================================

    fn texmap_command(&mut self, number: usize, line: &str, fields: &[Field<'_>]) -> Result<()> {
        let mode = match fields.get(2).map(|f| f.text) {
            Some("START") => TexmapMode::Start,
            Some("NEXT") => TexmapMode::Next,
            Some("FALLBACK") if fields.len() == 3 => {
                let open = self
                    .texmap
                    .as_mut()
                    .filter(|o| o.mode == TexmapMode::Start && o.section != TexmapSection::Fallback);
                if let Some(open) = open {
                    open.section = TexmapSection::Fallback;
                    return Ok(());
                }
                return self.stray_texmap_line(number, line);
            }
            Some("END") if fields.len() == 3 => {
                if self.texmap.as_ref().is_some_and(|o| o.mode == TexmapMode::Start) {
                    self.texmap = None;
                    return Ok(());
                }
                return self.stray_texmap_line(number, line);
            }
            _ => return self.stray_texmap_line(number, line),
        };

        let texmap = parse_texmap(mode, line, &fields[3..]).map_err(|m| self.format_error(number, m))?;
        self.close_texmap();
        let id = self.place(ElementKind::Texmap(texmap), None)?;
        self.texmap = Some(OpenTexmap {
            id,
            mode,
            section: TexmapSection::Shared,
            line: number,
        });
        Ok(())
    }

    fn stray_texmap_line(&mut self, number: usize, line: &str) -> Result<()> {
        warn!(line = number, "texmap command outside a texmap block kept as comment");
        let payload = line.trim().strip_prefix('0').unwrap_or(line).trim();
        self.place(ElementKind::comment(payload), None).map(drop)
    }

    /// `0 !: <geometry>`: drawn only by texmap-aware renderers.
    fn texture_line(&mut self, number: usize, line: &str, fields: &[Field<'_>]) -> Result<()> {
        let inner = rest_of_line(line, fields, 2);
        let inner_fields = super::lexer::fields(inner);
        let is_geometry = inner_fields
            .first()
            .is_some_and(|f| GEOMETRY_CODES.contains(&f.text));
        if self.texmap.is_none() || !is_geometry {
            return self.stray_texmap_line(number, line);
        }
        let kind = parse_geometry(inner, &inner_fields).map_err(|m| self.format_error(number, m))?;
        self.place(kind, Some(TexmapSection::Texture)).map(drop)
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Close open constructs, resolve group prefixes and return the page.
    pub(crate) fn finish(mut self) -> Result<NodeId> {
        self.end_header()?;
        self.flush_prefixes()?;
        if let Some(open) = self.texmap.take().filter(|o| o.mode == TexmapMode::Start) {
            warn!(line = open.line, "texmap block not closed before end of page");
        }

        for membership in std::mem::take(&mut self.memberships) {
            let joined = match self.doc.find_group(self.page, &membership.group) {
                Some(group) => self.doc.join_group(membership.element, group),
                None => Err(Error::invalid(format!("no group named '{}'", membership.group))),
            };
            if let Err(err) = joined {
                warn!(line = membership.line, group = %membership.group, %err, "group prefix dropped");
                let comment = self
                    .doc
                    .create_element(ElementKind::comment(&format!("MLCAD BTG {}", membership.group)))?;
                let container = self.doc.parent(membership.element)?.ok_or_else(|| {
                    Error::invalid(format!("{} is not attached", membership.element))
                })?;
                let index = self
                    .doc
                    .index_of(container, membership.element)?
                    .unwrap_or_default();
                self.doc.insert(container, index, comment)?;
            }
        }
        Ok(self.page)
    }
}

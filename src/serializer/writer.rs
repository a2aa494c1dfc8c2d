//! Node → LDraw text.

use crate::base::text::push_numbers;
use crate::base::{CRLF, MAIN_COLOUR, Matrix4, NodeId, Vector3};
use crate::colour::format_colour_code;
use crate::core::Result;
use crate::dom::{
    Document, Element, ElementKind, Graphic, NodeType, Page, PageType, Primitive, Reference, Texmap,
    TexmapMode, TexmapSection,
};

use super::{CodeStandard, WindingDirection};

impl Document {
    /// Append the LDraw text of node `id` and everything below it to `out`.
    ///
    /// Colour 16 on references and geometry is written as `override_colour`.
    /// Every coordinate and reference transform goes through `transform`, and
    /// a reversed `winding` flips polygon vertex order and `BFC` windings.
    pub fn to_code<'o>(
        &self,
        id: NodeId,
        out: &'o mut String,
        standard: CodeStandard,
        override_colour: u32,
        transform: &Matrix4,
        winding: WindingDirection,
    ) -> Result<&'o mut String> {
        let writer = Writer {
            doc: self,
            standard,
            override_colour,
            transform: *transform,
            winding,
        };
        writer.node(out, id)?;
        Ok(out)
    }

    /// The text of node `id` with the default colour, placement and winding.
    pub fn to_code_string(&self, id: NodeId, standard: CodeStandard) -> Result<String> {
        let mut out = String::new();
        self.to_code(
            id,
            &mut out,
            standard,
            MAIN_COLOUR,
            &Matrix4::IDENTITY,
            WindingDirection::Normal,
        )?;
        Ok(out)
    }
}

struct Writer<'d> {
    doc: &'d Document,
    standard: CodeStandard,
    override_colour: u32,
    transform: Matrix4,
    winding: WindingDirection,
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str(CRLF);
}

impl Writer<'_> {
    fn node(&self, out: &mut String, id: NodeId) -> Result<()> {
        match self.doc.node_type(id)? {
            NodeType::Document => self.document(out),
            NodeType::Page => self.page(out, id),
            NodeType::Step => self.children(out, id),
            NodeType::Element => self.element(out, id),
        }
    }

    fn children(&self, out: &mut String, id: NodeId) -> Result<()> {
        for child in self.doc.children(id)? {
            self.node(out, *child)?;
        }
        Ok(())
    }

    fn colour(&self, code: u32) -> String {
        if code == MAIN_COLOUR {
            format_colour_code(self.override_colour)
        } else {
            format_colour_code(code)
        }
    }

    // ========================================================================
    // Containers
    // ========================================================================

    fn document(&self, out: &mut String) -> Result<()> {
        let multi_page = self.doc.is_multi_page();
        for page in self.doc.pages() {
            if multi_page {
                line(out, &format!("0 FILE {}", self.doc.page(*page)?.target_name()));
            }
            self.page(out, *page)?;
            if multi_page {
                line(out, "0 NOFILE");
            }
        }
        Ok(())
    }

    fn page(&self, out: &mut String, id: NodeId) -> Result<()> {
        self.header(out, self.doc.page(id)?);
        let steps = self.doc.children(id)?;
        for (i, step) in steps.iter().enumerate() {
            self.children(out, *step)?;
            if i + 1 < steps.len() {
                line(out, "0 STEP");
            }
        }
        Ok(())
    }

    fn header(&self, out: &mut String, page: &Page) {
        let writes_type = self.standard == CodeStandard::PartsLibrary
            || page.is_unofficial()
            || page.update().is_some()
            || page.page_type() != PageType::from_file_name(page.target_name());
        let has_header = writes_type
            || page.title().is_some()
            || page.author().is_some()
            || page.license().is_some()
            || !page.help().is_empty()
            || page.bfc().keyword().is_some()
            || page.category().is_some()
            || !page.keywords().is_empty()
            || page.command_line().is_some()
            || !page.history().is_empty();
        if !has_header {
            return;
        }

        if let Some(title) = page.title() {
            line(out, &format!("0 {title}"));
        }
        line(out, &format!("0 Name: {}", page.target_name()));
        if let Some(author) = page.author() {
            line(out, &format!("0 Author: {author}"));
        }
        if writes_type {
            let mut text = String::from("0 !LDRAW_ORG ");
            if page.is_unofficial() {
                text.push_str("Unofficial_");
            }
            text.push_str(page.page_type().token());
            if let Some(update) = page.update() {
                text.push(' ');
                text.push_str(update);
            }
            line(out, &text);
        }
        if let Some(license) = page.license() {
            line(out, &format!("0 !LICENSE {license}"));
        }
        for help in page.help() {
            line(out, &format!("0 !HELP {help}"));
        }
        if let Some(bfc) = page.bfc().keyword() {
            line(out, &format!("0 BFC {bfc}"));
        }
        if let Some(category) = page.category() {
            line(out, &format!("0 !CATEGORY {category}"));
        }
        if !page.keywords().is_empty() {
            line(out, &format!("0 !KEYWORDS {}", page.keywords().join(", ")));
        }
        if let Some(command_line) = page.command_line() {
            line(out, &format!("0 !CMDLINE {command_line}"));
        }
        for history in page.history() {
            line(out, &format!("0 !HISTORY {history}"));
        }
    }

    // ========================================================================
    // Elements
    // ========================================================================

    fn element(&self, out: &mut String, id: NodeId) -> Result<()> {
        let element = self.doc.element(id)?;
        self.group_prefix(out, element)?;
        self.element_body(out, id, element)
    }

    /// The element's own lines, without its group prefix.
    fn element_body(&self, out: &mut String, id: NodeId, element: &Element) -> Result<()> {
        let library = self.standard == CodeStandard::PartsLibrary;
        match element.kind() {
            ElementKind::Comment(comment) if comment.is_blank() => out.push_str(CRLF),
            ElementKind::Comment(comment) => line(out, &format!("0 {}", comment.text())),
            ElementKind::Reference(reference) => self.reference(out, reference),
            ElementKind::Graphic(graphic) => self.graphic(out, graphic),
            ElementKind::Texmap(texmap) => self.texmap(out, id, texmap)?,
            ElementKind::BfcFlag(flag) => {
                let flag = if self.winding.is_reversed() {
                    flag.reversed()
                } else {
                    *flag
                };
                line(out, &format!("0 BFC {}", flag.keyword()));
            }
            ElementKind::Clear
            | ElementKind::Pause
            | ElementKind::Save
            | ElementKind::Write(_)
            | ElementKind::Group(_)
                if library => {}
            ElementKind::Clear => line(out, "0 CLEAR"),
            ElementKind::Pause => line(out, "0 PAUSE"),
            ElementKind::Save => line(out, "0 SAVE"),
            ElementKind::Write(write) => match write.text() {
                Some(text) => line(out, &format!("0 WRITE {text}")),
                None => line(out, "0 WRITE"),
            },
            ElementKind::Colour(entry) => line(out, &format!("0 {}", entry.definition())),
            ElementKind::Group(group) => line(
                out,
                &format!("0 GROUP {} {}", group.members().len(), group.name()),
            ),
        }
        Ok(())
    }

    /// `0 MLCAD BTG <group>` before a group member.
    fn group_prefix(&self, out: &mut String, element: &Element) -> Result<()> {
        if !self.standard.writes_instructions() {
            return Ok(());
        }
        if let Some(group) = element.group() {
            if let ElementKind::Group(group) = self.doc.kind(group)? {
                line(out, &format!("0 MLCAD BTG {}", group.name()));
            }
        }
        Ok(())
    }

    fn reference(&self, out: &mut String, reference: &Reference) {
        if reference.invert() {
            line(out, "0 BFC INVERTNEXT");
        }
        let placed = self.transform * *reference.transform();
        let mut text = format!("1 {} ", self.colour(reference.colour()));
        push_numbers(&mut text, &placed.to_ldraw());
        text.push(' ');
        text.push_str(reference.target_name());
        line(out, &text);
    }

    fn graphic(&self, out: &mut String, graphic: &Graphic) {
        let mut points: Vec<Vector3> = graphic
            .vertices()
            .iter()
            .map(|v| self.transform.transform_point(*v))
            .collect();
        let polygon = matches!(
            graphic.primitive(),
            Primitive::Triangle | Primitive::Quadrilateral
        );
        if polygon && self.winding.is_reversed() {
            points.reverse();
        }
        let mut text = format!(
            "{} {} ",
            graphic.primitive().line_type(),
            self.colour(graphic.colour())
        );
        let coordinates: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        push_numbers(&mut text, &coordinates);
        line(out, &text);
    }

    fn texmap(&self, out: &mut String, id: NodeId, texmap: &Texmap) -> Result<()> {
        let mode = match texmap.mode() {
            TexmapMode::Start => "START",
            TexmapMode::Next => "NEXT",
        };
        let projection = texmap.projection();
        let mut numbers: Vec<f64> = texmap
            .points()
            .iter()
            .map(|p| self.transform.transform_point(*p))
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        numbers.extend(projection.parameters());

        let mut text = format!("0 !TEXMAP {mode} {} ", projection.keyword());
        push_numbers(&mut text, &numbers);
        text.push(' ');
        text.push_str(&quoted(texmap.texture()));
        if let Some(glossmap) = texmap.glossmap() {
            text.push_str(" GLOSSMAP ");
            text.push_str(&quoted(glossmap));
        }
        line(out, &text);

        let children = self.doc.children(id)?;
        let section = |child: &NodeId| self.doc.texmap_section(*child).unwrap_or_default();
        for child in children.iter().filter(|c| section(c) != TexmapSection::Fallback) {
            if section(child) == TexmapSection::Texture {
                let element = self.doc.element(*child)?;
                self.group_prefix(out, element)?;
                let mut inner = String::new();
                self.element_body(&mut inner, *child, element)?;
                for text in inner.split_terminator(CRLF) {
                    line(out, &format!("0 !: {text}"));
                }
            } else {
                self.element(out, *child)?;
            }
        }
        let mut fallback = children
            .iter()
            .filter(|c| section(c) == TexmapSection::Fallback)
            .peekable();
        if fallback.peek().is_some() {
            line(out, "0 !TEXMAP FALLBACK");
        }
        for child in fallback {
            self.element(out, *child)?;
        }
        if texmap.mode() == TexmapMode::Start {
            line(out, "0 !TEXMAP END");
        }
        Ok(())
    }
}

fn quoted(name: &str) -> String {
    if name.contains(char::is_whitespace) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

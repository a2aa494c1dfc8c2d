//! Property setters.
//!
//! Every setter passes the mutation gate, stores the cleaned value and, when
//! the value actually changed, marks the document modified, emits `Changed` on
//! the node and `DescendantChanged` on each ancestor.

use smol_str::SmolStr;

use super::Document;
use super::element::{BfcFlag, ElementKind, Texmap};
use super::node::Node;
use super::page::{BfcCertification, Page, PageType};
use crate::base::text::{clean_text, is_legal_target_name, target_key};
use crate::base::{Matrix4, NodeId, Vector3};
use crate::colour::ColourEntry;
use crate::core::{Error, NodeEvent, Property, PropertyValue, Result};

type Change = Option<(PropertyValue, PropertyValue)>;

fn wrong_kind(kind: &ElementKind, property: &str) -> Error {
    Error::invalid(format!("a {} has no {property}", kind.type_name()))
}

fn changed<T: PartialEq>(old: T, new: T, wrap: impl Fn(T) -> PropertyValue) -> Change {
    (old != new).then(|| (wrap(old), wrap(new)))
}

impl Document {
    fn update_element(
        &mut self,
        id: NodeId,
        property: Property,
        apply: impl FnOnce(&mut ElementKind) -> Result<Change>,
    ) -> Result<()> {
        self.check_mutable(id)?;
        let element = self
            .node_mut(id)?
            .element_mut()
            .ok_or_else(|| Error::invalid(format!("{id} is not an element")))?;
        let change = apply(&mut element.kind)?;
        self.notify_change(id, property, change);
        Ok(())
    }

    fn update_page(
        &mut self,
        id: NodeId,
        property: Property,
        apply: impl FnOnce(&mut Page) -> Change,
    ) -> Result<()> {
        self.check_mutable(id)?;
        let page = self
            .node_mut(id)?
            .page_mut()
            .ok_or_else(|| Error::invalid(format!("{id} is not a page")))?;
        let change = apply(page);
        self.notify_change(id, property, change);
        Ok(())
    }

    fn notify_change(&mut self, id: NodeId, property: Property, change: Change) {
        let Some((old, new)) = change else {
            return;
        };
        self.modified = true;
        self.emit(
            id,
            NodeEvent::Changed {
                node: id,
                property,
                old,
                new,
            },
        );
        self.bubble(id, property);
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// Set the text of a comment or write command.
    ///
    /// Line breaks are removed and trailing whitespace trimmed; blank text
    /// clears a write message and leaves a comment empty.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.update_element(id, Property::Text, |kind| match kind {
            ElementKind::Comment(comment) => {
                let new = clean_text(text).unwrap_or_default();
                let old = std::mem::replace(&mut comment.text, new.clone());
                Ok(changed(old, new, PropertyValue::Text))
            }
            ElementKind::Write(write) => {
                let new = clean_text(text);
                let old = std::mem::replace(&mut write.text, new.clone());
                Ok(changed(old, new, PropertyValue::from))
            }
            other => Err(wrong_kind(other, "text")),
        })
    }

    pub fn set_colour(&mut self, id: NodeId, code: u32) -> Result<()> {
        self.update_element(id, Property::Colour, |kind| {
            let slot = match kind {
                ElementKind::Reference(r) => &mut r.colour,
                ElementKind::Graphic(g) => &mut g.colour,
                other => return Err(wrong_kind(other, "colour")),
            };
            let old = std::mem::replace(slot, code);
            Ok(changed(old, code, PropertyValue::Number))
        })
    }

    /// Replace all vertices of a graphic; the count must not change.
    pub fn set_vertices(&mut self, id: NodeId, vertices: Vec<Vector3>) -> Result<()> {
        self.update_element(id, Property::Vertices, |kind| {
            let ElementKind::Graphic(graphic) = kind else {
                return Err(wrong_kind(kind, "vertices"));
            };
            if vertices.len() != graphic.primitive.vertex_count() {
                return Err(Error::invalid(format!(
                    "expected {} vertices, got {}",
                    graphic.primitive.vertex_count(),
                    vertices.len()
                )));
            }
            let old = std::mem::replace(&mut graphic.vertices, vertices.clone());
            Ok(changed(old, vertices, PropertyValue::Vertices))
        })
    }

    pub fn set_vertex(&mut self, id: NodeId, index: usize, vertex: Vector3) -> Result<()> {
        let mut vertices = match self.kind(id)? {
            ElementKind::Graphic(graphic) => graphic.vertices.clone(),
            other => return Err(wrong_kind(other, "vertices")),
        };
        let slot = vertices
            .get_mut(index)
            .ok_or_else(|| Error::invalid(format!("vertex index {index} out of range")))?;
        *slot = vertex;
        self.set_vertices(id, vertices)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Matrix4) -> Result<()> {
        self.update_element(id, Property::Transform, |kind| {
            let ElementKind::Reference(r) = kind else {
                return Err(wrong_kind(kind, "transform"));
            };
            let old = std::mem::replace(&mut r.transform, transform);
            Ok(changed(old, transform, PropertyValue::Transform))
        })
    }

    /// Point a reference at another page name. The cached target is dropped.
    pub fn set_target_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        let name = name.trim();
        self.update_element(id, Property::TargetName, |kind| {
            let ElementKind::Reference(r) = kind else {
                return Err(wrong_kind(kind, "target name"));
            };
            if !is_legal_target_name(name) {
                return Err(Error::invalid(format!("'{name}' is not a legal target name")));
            }
            if r.target_name == name {
                return Ok(None);
            }
            r.target = None;
            let old = std::mem::replace(&mut r.target_name, SmolStr::new(name));
            Ok(Some((
                PropertyValue::Text(old.to_string()),
                PropertyValue::Text(name.to_string()),
            )))
        })
    }

    pub fn set_invert(&mut self, id: NodeId, invert: bool) -> Result<()> {
        self.update_element(id, Property::Invert, |kind| {
            let ElementKind::Reference(r) = kind else {
                return Err(wrong_kind(kind, "invert flag"));
            };
            let old = std::mem::replace(&mut r.invert, invert);
            Ok(changed(old, invert, PropertyValue::Bool))
        })
    }

    pub fn set_bfc_flag(&mut self, id: NodeId, flag: BfcFlag) -> Result<()> {
        self.update_element(id, Property::BfcFlag, |kind| {
            let ElementKind::BfcFlag(current) = kind else {
                return Err(wrong_kind(kind, "BFC flag"));
            };
            let old = std::mem::replace(current, flag);
            Ok(changed(old, flag, |f| PropertyValue::Text(f.keyword().to_string())))
        })
    }

    pub fn set_group_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        let name = name.trim().to_string();
        self.update_element(id, Property::GroupName, |kind| {
            let ElementKind::Group(group) = kind else {
                return Err(wrong_kind(kind, "group name"));
            };
            if name.is_empty() {
                return Err(Error::invalid("group name cannot be empty"));
            }
            let old = std::mem::replace(&mut group.name, name.clone());
            Ok(changed(old, name, PropertyValue::Text))
        })
    }

    /// Replace a texmap's projection, points and image names.
    pub fn set_texmap(&mut self, id: NodeId, texmap: Texmap) -> Result<()> {
        self.update_element(id, Property::Texmap, |kind| {
            let ElementKind::Texmap(current) = kind else {
                return Err(wrong_kind(kind, "texture mapping"));
            };
            if *current == texmap {
                return Ok(None);
            }
            *current = texmap;
            Ok(Some((PropertyValue::None, PropertyValue::None)))
        })
    }

    /// Edit a `!COLOUR` definition in place.
    ///
    /// The entry's own lock applies in addition to the node's gates.
    pub fn modify_colour(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut ColourEntry) -> Result<()>,
    ) -> Result<()> {
        self.update_element(id, Property::ColourDefinition, |kind| {
            let ElementKind::Colour(entry) = kind else {
                return Err(wrong_kind(kind, "colour definition"));
            };
            let old = entry.definition();
            edit(entry)?;
            Ok(changed(old, entry.definition(), PropertyValue::Text))
        })
    }

    // ========================================================================
    // Pages
    // ========================================================================

    pub fn set_title(&mut self, id: NodeId, title: &str) -> Result<()> {
        let title = clean_text(title);
        self.update_page(id, Property::Title, |page| {
            let old = std::mem::replace(&mut page.title, title.clone());
            changed(old, title, PropertyValue::from)
        })
    }

    pub fn set_author(&mut self, id: NodeId, author: &str) -> Result<()> {
        let author = clean_text(author);
        self.update_page(id, Property::Author, |page| {
            let old = std::mem::replace(&mut page.author, author.clone());
            changed(old, author, PropertyValue::from)
        })
    }

    pub fn set_page_type(&mut self, id: NodeId, page_type: PageType, unofficial: bool) -> Result<()> {
        self.update_page(id, Property::PageType, |page| {
            let old = (page.page_type, page.unofficial);
            page.page_type = page_type;
            page.unofficial = unofficial;
            changed(old, (page_type, unofficial), |(t, u)| {
                PropertyValue::Text(if u {
                    format!("Unofficial_{t}")
                } else {
                    t.to_string()
                })
            })
        })
    }

    pub fn set_bfc_certification(&mut self, id: NodeId, bfc: BfcCertification) -> Result<()> {
        self.update_page(id, Property::BfcCertification, |page| {
            let old = std::mem::replace(&mut page.bfc, bfc);
            changed(old, bfc, |b| PropertyValue::from(b.keyword().map(str::to_string)))
        })
    }

    pub fn set_category(&mut self, id: NodeId, category: &str) -> Result<()> {
        let category = clean_text(category);
        self.update_page(id, Property::Category, |page| {
            let old = std::mem::replace(&mut page.category, category.clone());
            changed(old, category, PropertyValue::from)
        })
    }

    pub fn set_keywords(&mut self, id: NodeId, keywords: Vec<String>) -> Result<()> {
        let keywords = clean_lines(keywords);
        self.update_page(id, Property::Keywords, |page| {
            let old = std::mem::replace(&mut page.keywords, keywords.clone());
            changed(old, keywords, PropertyValue::Lines)
        })
    }

    pub fn set_help(&mut self, id: NodeId, help: Vec<String>) -> Result<()> {
        let help = clean_lines(help);
        self.update_page(id, Property::Help, |page| {
            let old = std::mem::replace(&mut page.help, help.clone());
            changed(old, help, PropertyValue::Lines)
        })
    }

    pub fn set_history(&mut self, id: NodeId, history: Vec<String>) -> Result<()> {
        let history = clean_lines(history);
        self.update_page(id, Property::History, |page| {
            let old = std::mem::replace(&mut page.history, history.clone());
            changed(old, history, PropertyValue::Lines)
        })
    }

    pub fn set_command_line(&mut self, id: NodeId, command_line: &str) -> Result<()> {
        let command_line = clean_text(command_line);
        self.update_page(id, Property::CommandLine, |page| {
            let old = std::mem::replace(&mut page.command_line, command_line.clone());
            changed(old, command_line, PropertyValue::from)
        })
    }

    pub fn set_license(&mut self, id: NodeId, license: &str) -> Result<()> {
        let license = clean_text(license);
        self.update_page(id, Property::License, |page| {
            let old = std::mem::replace(&mut page.license, license.clone());
            changed(old, license, PropertyValue::from)
        })
    }

    pub fn set_update(&mut self, id: NodeId, update: &str) -> Result<()> {
        let update = clean_text(update);
        self.update_page(id, Property::Update, |page| {
            let old = std::mem::replace(&mut page.update, update.clone());
            changed(old, update, PropertyValue::from)
        })
    }

    /// Rename a page and rewrite every reference in this document that used
    /// the old name.
    pub fn rename_page(&mut self, id: NodeId, name: &str) -> Result<()> {
        let name = name.trim();
        self.check_mutable(id)?;
        let old_name = self.page(id)?.target_name.clone();
        if !is_legal_target_name(name) {
            return Err(Error::invalid(format!("'{name}' is not a legal target name")));
        }
        let key = target_key(name);
        let clash = self.pages().iter().any(|p| {
            *p != id
                && self
                    .nodes
                    .get(*p)
                    .and_then(Node::page)
                    .is_some_and(|page| target_key(page.target_name()) == key)
        });
        if clash {
            return Err(Error::invalid(format!("a page named '{name}' already exists")));
        }
        let referrers = self.references_to(&old_name);
        for referrer in &referrers {
            self.check_mutable(*referrer)?;
        }

        self.update_page(id, Property::TargetName, |page| {
            let old = std::mem::replace(&mut page.target_name, SmolStr::new(name));
            changed(old.to_string(), name.to_string(), PropertyValue::Text)
        })?;
        for referrer in referrers {
            self.set_target_name(referrer, name)?;
        }
        Ok(())
    }
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines.iter().filter_map(|line| clean_text(line)).collect()
}

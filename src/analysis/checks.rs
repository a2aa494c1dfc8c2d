//! The checks run by [`Document::analyse`] and the fixes they offer.

use tracing::debug;

use super::problem::{Fix, FixAction, Problem, ProblemCollector, Severity, codes};
use crate::base::{EDGE_COLOUR, NodeId};
use crate::core::{Error, Result};
use crate::dom::{Document, ElementKind, NodeType, Page, Primitive};
use crate::serializer::CodeStandard;

impl Document {
    /// Check `id` and everything below it against `standard`.
    ///
    /// Problems are reported in document order. Analysis never modifies the
    /// document; see [`Document::apply_fix`].
    pub fn analyse(&self, id: NodeId, standard: CodeStandard) -> Result<Vec<Problem>> {
        let mut collector = ProblemCollector::new();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            match self.node_type(node)? {
                NodeType::Page => check_page(&mut collector, node, self.page(node)?, standard),
                NodeType::Element => self.check_element(&mut collector, node, standard)?,
                NodeType::Document | NodeType::Step => {}
            }
        }
        debug!(
            node = %id,
            %standard,
            errors = collector.error_count(),
            warnings = collector.warning_count(),
            "analysis finished"
        );
        Ok(collector.into_problems())
    }

    /// Apply `fix` through the ordinary mutation methods, so the usual
    /// frozen, locked and read-only checks apply.
    pub fn apply_fix(&mut self, fix: &Fix) -> Result<()> {
        debug!(node = %fix.node, fix = %fix.description, "applying fix");
        match &fix.action {
            FixAction::Remove => {
                let parent = self
                    .parent(fix.node)?
                    .ok_or_else(|| Error::invalid(format!("{} is not attached", fix.node)))?;
                self.remove(parent, fix.node)?;
                self.dispose(fix.node)
            }
            FixAction::PrefixComment => {
                let text = match self.kind(fix.node)? {
                    ElementKind::Comment(comment) => comment.text().to_string(),
                    other => {
                        return Err(Error::invalid(format!(
                            "a {} has no comment text",
                            other.type_name()
                        )));
                    }
                };
                self.set_text(fix.node, &format!("// {text}"))
            }
            FixAction::SetColour(code) => self.set_colour(fix.node, *code),
        }
    }

    fn check_element(
        &self,
        collector: &mut ProblemCollector,
        id: NodeId,
        standard: CodeStandard,
    ) -> Result<()> {
        let kind = self.kind(id)?;
        let library = standard == CodeStandard::PartsLibrary;
        match kind {
            ElementKind::Comment(comment) if !comment.is_blank() && !comment.has_prefix() => {
                let severity = if standard.is_export() {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                collector.add(
                    Problem::new(
                        codes::MISSING_COMMENT_MARKER,
                        severity,
                        id,
                        format!("comment '{}' does not start with '//'", comment.text()),
                    )
                    .with_fix(Fix::prefix_comment(id)),
                );
            }
            ElementKind::Clear
            | ElementKind::Pause
            | ElementKind::Save
            | ElementKind::Write(_)
            | ElementKind::Group(_)
                if library =>
            {
                collector.add(
                    Problem::warning(
                        codes::INSTRUCTION_COMMAND,
                        id,
                        format!("{} commands are not written for library parts", kind.type_name()),
                    )
                    .with_fix(Fix::remove(id, kind.type_name())),
                );
            }
            ElementKind::Colour(entry) if library => {
                collector.add(
                    Problem::error(
                        codes::COLOUR_DEFINITION,
                        id,
                        format!("library parts may not define colour {}", entry.code()),
                    )
                    .with_fix(Fix::remove(id, "colour definition")),
                );
            }
            ElementKind::Graphic(graphic) => {
                if graphic.is_degenerate() {
                    collector.add(
                        Problem::error(
                            codes::DEGENERATE_GEOMETRY,
                            id,
                            format!("degenerate {}", kind.type_name()),
                        )
                        .with_fix(Fix::remove(id, kind.type_name())),
                    );
                }
                let edge = matches!(
                    graphic.primitive(),
                    Primitive::Line | Primitive::OptionalLine
                );
                if library && edge && graphic.colour() != EDGE_COLOUR {
                    collector.add(
                        Problem::warning(
                            codes::LINE_COLOUR,
                            id,
                            format!(
                                "{} uses colour {} instead of {EDGE_COLOUR}",
                                kind.type_name(),
                                graphic.colour()
                            ),
                        )
                        .with_fix(Fix::set_colour(id, EDGE_COLOUR)),
                    );
                }
            }
            ElementKind::Reference(reference) => {
                if self.reference_target(id)?.is_none() {
                    collector.add(Problem::warning(
                        codes::UNRESOLVED_REFERENCE,
                        id,
                        format!("'{}' could not be found", reference.target_name()),
                    ));
                }
                if reference.transform().is_singular() {
                    collector.add(Problem::error(
                        codes::SINGULAR_TRANSFORM,
                        id,
                        format!("the transform of '{}' is singular", reference.target_name()),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn check_page(collector: &mut ProblemCollector, id: NodeId, page: &Page, standard: CodeStandard) {
    if standard != CodeStandard::PartsLibrary {
        return;
    }
    if page.author().is_none() {
        collector.add(Problem::error(
            codes::MISSING_AUTHOR,
            id,
            format!("{} has no author", page.target_name()),
        ));
    }
    if page.bfc().keyword().is_none() {
        collector.add(Problem::warning(
            codes::MISSING_BFC_CERTIFICATION,
            id,
            format!("{} declares no BFC certification", page.target_name()),
        ));
    }
}

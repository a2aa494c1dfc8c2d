//! Target-name normalisation: page naming and reference redirects.

use smol_str::SmolStr;
use tracing::debug;

use super::ParseOptions;
use crate::base::text::{is_legal_target_name, legalize_target_name, target_key};
use crate::base::{Matrix4, NodeId};
use crate::core::{Error, Result};
use crate::dom::{Document, ElementKind, PageResolver};

/// A legal name for a page declared as `declared` that no page of `doc` uses.
///
/// Illegal characters are replaced first; a clash then gets `_2`, `_3`, …
/// inserted before the extension.
pub(crate) fn page_name(doc: &Document, declared: &str) -> SmolStr {
    let declared = declared.trim();
    let legal = if is_legal_target_name(declared) {
        declared.to_string()
    } else {
        legalize_target_name(declared)
    };
    if doc.page_by_name(&legal).is_none() {
        return legal.into();
    }
    let (stem, extension) = match legal.rfind('.') {
        Some(dot) if dot > 0 => legal.split_at(dot),
        _ => (legal.as_str(), ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}{extension}");
        if doc.page_by_name(&candidate).is_none() {
            return candidate.into();
        }
        n += 1;
    }
}

/// Point every reference naming `old` at `new`. Returns how many changed.
pub(crate) fn retarget(doc: &mut Document, old: &str, new: &str) -> Result<usize> {
    let referrers = doc.references_to(old);
    for id in &referrers {
        doc.set_target_name(*id, new)?;
    }
    Ok(referrers.len())
}

/// Rewrite references whose target was renumbered, moved or aliased.
///
/// Returns true if any reference changed.
pub(crate) fn follow_redirects(
    doc: &mut Document,
    resolver: &dyn PageResolver,
    options: &ParseOptions,
) -> Result<bool> {
    let mut modified = false;
    for id in doc.elements(doc.root()) {
        let (name, transform) = match doc.kind(id)? {
            ElementKind::Reference(r) => (SmolStr::new(r.target_name()), *r.transform()),
            _ => continue,
        };
        if let Some((target, transform)) = redirect(doc, resolver, options, &name, transform)? {
            debug!(reference = %id, from = %name, to = %target, "reference redirected");
            rewrite(doc, id, &target, transform)?;
            modified = true;
        }
    }
    Ok(modified)
}

fn rewrite(doc: &mut Document, id: NodeId, target: &str, transform: Matrix4) -> Result<()> {
    doc.set_target_name(id, target)?;
    doc.set_transform(id, transform)
}

/// Follow the redirect chain starting at `name`.
///
/// The x-series table applies first, whatever the options say. Moved-to and
/// alias pages are then followed while the options allow it; each hop
/// composes its own reference transform onto the running one. Names of pages
/// in `doc` itself are never rewritten.
fn redirect(
    doc: &Document,
    resolver: &dyn PageResolver,
    options: &ParseOptions,
    name: &SmolStr,
    transform: Matrix4,
) -> Result<Option<(SmolStr, Matrix4)>> {
    if doc.page_by_name(name).is_some() {
        return Ok(None);
    }
    let mut chain = vec![name.clone()];
    let mut current = name.clone();
    let mut transform = transform;

    if let Some(renumbered) = resolver.x_series_redirect(&current) {
        transform = transform * renumbered.transform;
        current = renumbered.target;
        chain.push(current.clone());
    }

    while doc.page_by_name(&current).is_none() {
        let Some(found) = resolver.resolve(&current) else {
            break;
        };
        let page = found.page()?;
        let follow = (options.follow_redirects && page.is_redirect())
            || (options.follow_aliases && page.page_type().is_alias());
        if !follow {
            break;
        }
        let Some(next) = found.document.forwarding_reference(found.page) else {
            break;
        };
        let target = SmolStr::new(next.target_name());
        transform = transform * *next.transform();
        let seen = chain.iter().any(|n| target_key(n) == target_key(&target));
        chain.push(target.clone());
        if seen {
            return Err(Error::CircularReference { chain });
        }
        current = target;
    }

    Ok((chain.len() > 1).then_some((current, transform)))
}

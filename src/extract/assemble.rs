//! Document assembly: dimensions, namespace, view box and wrappers.
//!
//! DESIGN
//! ======
//! Every emitted document is a standalone `<svg>` with an `xmlns`
//! declaration and, where they can be resolved, explicit `width`/`height`.
//! Symbols and parts are re-rooted under a synthesized wrapper that carries
//! the owner's view box and one copy of the owner's shared definitions.
//!
//! Dimension chain: the `width`+`height` attribute pair, else the view box,
//! then each still-missing side falls back to the rounded bounding box.
//! Zero, negative and relative (`%`, `em`) lengths count as absent.

use crate::dom::{Document, ElementData, Fragment, FragmentChild, NodeId, SVG_NAMESPACE, XLINK_NAMESPACE};
use crate::page::{PageSnapshot, Rect};

use super::color::sanitize_fragment;

/// Resolved size of an emitted document, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

// =============================================================================
// LENGTHS
// =============================================================================

/// Parse an absolute length (`24`, `24px`, `1.5`). Relative units yield `None`.
#[must_use]
pub fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    number.parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}

/// Width and height of a `min-x min-y width height` view box.
#[must_use]
pub fn view_box_size(value: &str) -> Option<(f64, f64)> {
    let numbers: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<_>>()?;
    match numbers.as_slice() {
        [_, _, width, height] if *width >= 0.0 && *height >= 0.0 => Some((*width, *height)),
        _ => None,
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|n| *n > 0.0)
}

// =============================================================================
// DIMENSIONS
// =============================================================================

/// Size declared on the element itself: attribute pair, else view box.
#[must_use]
pub fn declared_dimensions(element: &ElementData) -> Dimensions {
    if let (Some(width), Some(height)) = (element.non_empty_attr("width"), element.non_empty_attr("height")) {
        return Dimensions { width: positive(parse_length(width)), height: positive(parse_length(height)) };
    }
    element
        .attr("viewBox")
        .and_then(view_box_size)
        .map(|(width, height)| Dimensions { width: positive(Some(width)), height: positive(Some(height)) })
        .unwrap_or_default()
}

/// Full dimension chain, with the measured box as the last resort.
#[must_use]
pub fn resolve_dimensions(element: &ElementData, bbox: Option<Rect>) -> Dimensions {
    let declared = declared_dimensions(element);
    Dimensions {
        width: declared.width.or_else(|| positive(bbox.map(|b| b.width.round()))),
        height: declared.height.or_else(|| positive(bbox.map(|b| b.height.round()))),
    }
}

/// Size from explicit `width`/`height` attributes only, each side independent.
#[must_use]
pub fn attribute_dimensions(element: &ElementData) -> Dimensions {
    Dimensions {
        width: positive(element.attr("width").and_then(parse_length)),
        height: positive(element.attr("height").and_then(parse_length)),
    }
}

/// View box for a wrapper around `node`'s content.
///
/// The `viewBox` attribute, else `0 0 w h` from explicit sizing, else from
/// the measured box.
#[must_use]
pub fn resolve_view_box(page: &dyn PageSnapshot, node: NodeId) -> Option<String> {
    let element = page.document().element(node)?;
    if let Some(view_box) = element.non_empty_attr("viewBox") {
        return Some(view_box.trim().to_owned());
    }
    let explicit = attribute_dimensions(element);
    if let (Some(width), Some(height)) = (explicit.width, explicit.height) {
        return Some(format!("0 0 {width} {height}"));
    }
    let bbox = page.bounding_box(node)?;
    let (width, height) = (bbox.width.round(), bbox.height.round());
    (width > 0.0 && height > 0.0).then(|| format!("0 0 {width} {height}"))
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Declare the SVG namespace on `root` unless it already does, and the
/// `xlink` prefix when any element in the tree uses it.
pub fn ensure_namespace(root: &mut Fragment) {
    if !root.has_attr("xmlns") {
        root.set_attr("xmlns", SVG_NAMESPACE);
    }
    let uses_xlink = root.any(&|e| e.attrs.iter().any(|(name, _)| name.starts_with("xlink:")));
    if uses_xlink && !root.has_attr("xmlns:xlink") {
        root.set_attr("xmlns:xlink", XLINK_NAMESPACE);
    }
}

/// Write resolved dimensions onto `root` where it lacks an absolute size.
pub fn ensure_dimensions(root: &mut Fragment, dimensions: Dimensions) {
    for (name, value) in [("width", dimensions.width), ("height", dimensions.height)] {
        let Some(value) = value else { continue };
        if positive(root.attr(name).and_then(parse_length)).is_none() {
            root.set_attr(name, value.to_string());
        }
    }
}

/// One `<defs>` holding copies of the definitions under `owner`'s direct
/// `defs` children. Symbols are left out; each is emitted on its own.
#[must_use]
pub fn shared_definitions(doc: &Document, owner: NodeId) -> Option<Fragment> {
    let mut defs = Fragment::new("defs");
    for block in doc.child_elements(owner).filter(|c| doc.tag(*c) == Some("defs")) {
        for definition in doc.child_elements(block).filter(|d| doc.tag(*d) != Some("symbol")) {
            if let Some(copy) = doc.clone_subtree(definition) {
                defs.push(copy);
            }
        }
    }
    (!defs.children.is_empty()).then_some(defs)
}

/// Synthesized standalone root around `children`.
#[must_use]
pub fn wrap(children: Vec<FragmentChild>, view_box: Option<&str>, defs: Option<Fragment>) -> Fragment {
    let mut root = Fragment::new("svg").with_attr("xmlns", SVG_NAMESPACE);
    if let Some(view_box) = view_box {
        root.set_attr("viewBox", view_box);
    }
    if let Some(defs) = defs {
        root.push(defs);
    }
    root.children.extend(children);
    root
}

/// Sanitize colors and serialize through the page. Always the last step
/// before emitting.
#[must_use]
pub fn finish(page: &dyn PageSnapshot, mut root: Fragment) -> String {
    ensure_namespace(&mut root);
    sanitize_fragment(&mut root);
    page.serialize(&root)
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;

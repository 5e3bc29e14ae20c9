//! Part decomposition of composite inline graphics.
//!
//! A graphic with two or more meaningful direct children is split into one
//! standalone document per child. Each part is built from its own clone, in
//! document order, under a wrapper carrying the parent's view box, its
//! resolved width and height, and one copy of the parent's shared definitions. Paint color comes from the
//! parent, computed-paint inlining is scoped to the child's subtree.

use crate::dom::{Document, FragmentChild, NodeId};
use crate::page::PageSnapshot;

use super::assemble::{ensure_dimensions, finish, resolve_dimensions, resolve_view_box, shared_definitions, wrap};
use super::discover::label_chain;
use super::style::resolve_styles;
use super::{ExtractError, GraphicPart, part_id};

/// Direct children that count as a part.
pub const MEANINGFUL_TAGS: &[&str] = &["path", "circle", "rect", "ellipse", "line", "polyline", "polygon", "g", "text", "use"];

#[must_use]
pub fn meaningful_children(doc: &Document, svg: NodeId) -> Vec<NodeId> {
    doc.child_elements(svg)
        .filter(|c| doc.tag(*c).is_some_and(|tag| MEANINGFUL_TAGS.contains(&tag)))
        .collect()
}

/// Parts of the graphic rooted at `svg`; empty for fewer than two children.
///
/// # Errors
///
/// Returns [`ExtractError::Extraction`] if the graphic or a child is not an
/// element.
pub fn decompose(page: &dyn PageSnapshot, svg: NodeId, parent_id: &str) -> Result<Vec<GraphicPart>, ExtractError> {
    let doc = page.document();
    let children = meaningful_children(doc, svg);
    if children.len() < 2 {
        return Ok(Vec::new());
    }

    let element = doc
        .element(svg)
        .ok_or_else(|| ExtractError::Extraction(format!("graphic {svg} is not an element")))?;
    let dimensions = resolve_dimensions(element, page.bounding_box(svg));
    let view_box = resolve_view_box(page, svg);
    let defs = shared_definitions(doc, svg);

    children
        .into_iter()
        .enumerate()
        .map(|(index, child)| -> Result<GraphicPart, ExtractError> {
            let mut clone = doc
                .clone_subtree(child)
                .ok_or_else(|| ExtractError::Extraction(format!("part {child} is not an element")))?;
            resolve_styles(page, &mut clone, svg);

            let tag = clone.name.clone();
            let mut root = wrap(vec![FragmentChild::Element(clone)], view_box.as_deref(), defs.clone());
            ensure_dimensions(&mut root, dimensions);
            Ok(GraphicPart {
                id: part_id(parent_id, index + 1),
                content: finish(page, root),
                label: label_chain(doc, child).unwrap_or_else(|| tag.clone()),
                tag,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "decompose_test.rs"]
mod tests;

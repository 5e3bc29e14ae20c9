//! Approximated computed style and geometry for engines without layout.
//!
//! DESIGN
//! ======
//! Resolution order for a property on an element:
//! 1. last declaration in the inline `style` attribute
//! 2. presentation attribute (`fill`, `stroke`, `color`)
//! 3. parent's computed value, for inherited properties
//! 4. the CSS initial value
//!
//! Colors are reported the way browsers report computed colors
//! (`rgb(r, g, b)` / `rgba(r, g, b, a)`). A value that fails to parse is
//! treated like an unresolvable custom property: inherited properties fall
//! back to the parent, others to their initial value. Stylesheets are not
//! consulted.
//!
//! Geometry comes from explicit sizing only: `width`/`height` attributes,
//! then the view box. Elements hidden by `display: none` or the `hidden`
//! attribute (on themselves or any ancestor) measure as an empty box.

use crate::dom::style::declared_value;
use crate::dom::{Document, NodeId};
use crate::extract::assemble::{parse_length, view_box_size};
use crate::extract::color::{parse_color, url_target};

use super::Rect;

/// Properties whose computed value flows from parent to child.
const INHERITED: &[&str] = &["color", "fill", "stroke"];

/// Properties that may also be given as a presentation attribute.
const PRESENTATION: &[&str] = &["color", "fill", "stroke", "display"];

fn initial_value(property: &str) -> Option<&'static str> {
    match property {
        "color" | "fill" => Some("rgb(0, 0, 0)"),
        "stroke" | "background-image" => Some("none"),
        "display" => Some("inline"),
        _ => None,
    }
}

// =============================================================================
// STYLE
// =============================================================================

/// Computed value of `property` on element `node`.
#[must_use]
pub fn computed_value(doc: &Document, node: NodeId, property: &str) -> Option<String> {
    doc.element(node)?;
    match property {
        "color" | "fill" | "stroke" => Some(computed_paint(doc, node, property)),
        "background-image" => Some(computed_background(doc, node)),
        _ => specified_value(doc, node, property)
            .map(str::to_owned)
            .or_else(|| initial_value(property).map(str::to_owned)),
    }
}

/// The value written for `property` on the element itself, if any.
fn specified_value<'a>(doc: &'a Document, node: NodeId, property: &str) -> Option<&'a str> {
    let element = doc.element(node)?;
    element
        .attr("style")
        .and_then(|block| declared_value(block, property))
        .or_else(|| PRESENTATION.contains(&property).then(|| element.attr(property)).flatten())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn inherited_value(doc: &Document, node: NodeId, property: &str) -> String {
    match doc.parent_element(node) {
        Some(parent) if INHERITED.contains(&property) => computed_paint(doc, parent, property),
        _ => initial_value(property).unwrap_or_default().to_owned(),
    }
}

fn computed_paint(doc: &Document, node: NodeId, property: &str) -> String {
    let Some(value) = specified_value(doc, node, property) else {
        return inherited_value(doc, node, property);
    };

    if value.eq_ignore_ascii_case("inherit") {
        return inherited_value(doc, node, property);
    }
    if value.eq_ignore_ascii_case("currentcolor") {
        return if property == "color" {
            inherited_value(doc, node, property)
        } else {
            computed_paint(doc, node, "color")
        };
    }
    if property != "color" && value.eq_ignore_ascii_case("none") {
        return "none".to_owned();
    }
    if property != "color" {
        if let Some(target) = url_target(value) {
            return format!("url(\"{target}\")");
        }
    }
    match parse_color(value) {
        Some(rgba) => rgba.to_css(),
        None => inherited_value(doc, node, property),
    }
}

fn computed_background(doc: &Document, node: NodeId) -> String {
    let Some(block) = doc.attr(node, "style") else {
        return "none".to_owned();
    };
    declared_value(block, "background-image")
        .or_else(|| declared_value(block, "background").filter(|v| v.to_ascii_lowercase().contains("url(")))
        .map_or_else(|| "none".to_owned(), str::to_owned)
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// `true` when the element or an ancestor is removed from rendering.
#[must_use]
pub fn is_hidden(doc: &Document, node: NodeId) -> bool {
    std::iter::once(node).chain(doc.ancestors(node)).any(|n| {
        doc.element(n).is_some_and(|e| {
            e.attr("hidden").is_some()
                || specified_value(doc, n, "display").is_some_and(|d| d.eq_ignore_ascii_case("none"))
        })
    })
}

/// Bounding box from explicit sizing, or `None` when nothing is declared.
#[must_use]
pub fn estimated_box(doc: &Document, node: NodeId) -> Option<Rect> {
    doc.element(node)?;
    if is_hidden(doc, node) {
        return Some(Rect::default());
    }
    if let Some((width, height)) = intrinsic_size(doc, node) {
        return Some(Rect::sized(width, height));
    }
    doc.attr(node, "viewBox")
        .and_then(view_box_size)
        .map(|(w, h)| Rect::sized(w, h))
}

/// Declared `width`/`height` pair, both required.
#[must_use]
pub fn intrinsic_size(doc: &Document, node: NodeId) -> Option<(f64, f64)> {
    let element = doc.element(node)?;
    let width = element.attr("width").and_then(parse_length)?;
    let height = element.attr("height").and_then(parse_length)?;
    Some((width, height))
}

#[cfg(test)]
#[path = "cascade_test.rs"]
mod tests;

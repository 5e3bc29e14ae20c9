//! Style resolution: make a cloned subtree independent of the page cascade.
//!
//! Two passes over an owned [`Fragment`]:
//! 1. every literal `currentColor` is replaced by the context element's
//!    computed `color`, as lowercase hex
//! 2. paintable shapes without a usable `fill`/`stroke` attribute get the
//!    computed value inlined (`none`, a hex color, or [`FALLBACK_COLOR`])
//!
//! Computed values are read through each clone's `origin`, so the live
//! document is only ever borrowed.

use crate::dom::{Fragment, FragmentChild, NodeId};
use crate::page::PageSnapshot;

use super::color::{FALLBACK_COLOR, Rgba, is_portable_color, parse_color};

/// Shapes whose paint is inlined from computed style.
pub const PAINTABLE_TAGS: &[&str] =
    &["path", "circle", "rect", "ellipse", "line", "polyline", "polygon", "text", "tspan", "use"];

const PAINT_PROPERTIES: &[&str] = &["fill", "stroke"];

const CONTEXT_COLOR: &str = "currentcolor";

/// Computed `color` of `node` as lowercase hex, if it parses.
#[must_use]
pub fn effective_paint_color(page: &dyn PageSnapshot, node: NodeId) -> Option<String> {
    page.computed_style(node, "color")
        .as_deref()
        .and_then(parse_color)
        .map(Rgba::to_hex)
}

/// Replace every `currentColor` (any case) in attribute values and `<style>`
/// element text below `root` with `color`.
pub fn substitute_context_color(root: &mut Fragment, color: &str) {
    root.walk_mut(&mut |element| {
        for (_, value) in &mut element.attrs {
            if let Some(replaced) = replace_ignore_case(value, CONTEXT_COLOR, color) {
                *value = replaced;
            }
        }
        if element.name != "style" {
            return;
        }
        for child in &mut element.children {
            let FragmentChild::Text(text) = child else { continue };
            if let Some(replaced) = replace_ignore_case(text, CONTEXT_COLOR, color) {
                *text = replaced;
            }
        }
    });
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    let lower = haystack.to_ascii_lowercase();
    if !lower.contains(needle) {
        return None;
    }
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

/// Inline computed `fill`/`stroke` on paintable shapes that lack a portable
/// attribute value.
pub fn inline_computed_paint(page: &dyn PageSnapshot, root: &mut Fragment) {
    root.walk_mut(&mut |element| {
        let Some(origin) = element.origin else { return };
        if !PAINTABLE_TAGS.contains(&element.name.as_str()) {
            return;
        }
        for property in PAINT_PROPERTIES {
            if element.attr(property).is_some_and(is_portable_color) {
                continue;
            }
            let computed = page.computed_style(origin, property);
            element.set_attr(property, literal_paint(computed.as_deref()));
        }
    });
}

/// Portable literal for a computed paint value.
fn literal_paint(computed: Option<&str>) -> String {
    match computed.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("none") => "none".to_owned(),
        Some(value) => parse_color(value).map_or_else(|| FALLBACK_COLOR.to_owned(), Rgba::to_hex),
        None => FALLBACK_COLOR.to_owned(),
    }
}

/// Both passes, with `context` supplying the paint color.
pub fn resolve_styles(page: &dyn PageSnapshot, root: &mut Fragment, context: NodeId) {
    if let Some(color) = effective_paint_color(page, context) {
        substitute_context_color(root, &color);
    }
    inline_computed_paint(page, root);
}

#[cfg(test)]
#[path = "style_test.rs"]
mod tests;

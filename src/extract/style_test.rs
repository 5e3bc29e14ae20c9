use super::*;
use crate::page::fake::FakePage;

fn resolved(page: &FakePage, id: &str) -> String {
    let node = page.node(id);
    let mut clone = page.document().clone_subtree(node).unwrap();
    resolve_styles(page, &mut clone, node);
    clone.serialize()
}

#[test]
fn effective_paint_color_is_lowercase_hex() {
    let page = FakePage::body(r#"<svg id="s"></svg>"#).with_style("s", "color", "rgb(18, 52, 86)");
    assert_eq!(effective_paint_color(&page, page.node("s")).as_deref(), Some("#123456"));
}

#[test]
fn current_color_becomes_computed_color() {
    let page = FakePage::body(r#"<svg id="s"><path fill="currentColor" d="M0 0"/></svg>"#)
        .with_style("s", "color", "rgb(18, 52, 86)");
    let out = resolved(&page, "s");
    assert!(out.contains(r##"fill="#123456""##), "{out}");
    assert!(!out.to_ascii_lowercase().contains("currentcolor"));
}

#[test]
fn current_color_is_replaced_inside_style_blocks() {
    let mut root = Fragment::new("svg").with_attr("style", "stroke: CURRENTCOLOR; fill:currentcolor");
    substitute_context_color(&mut root, "#abcdef");
    assert_eq!(root.attr("style"), Some("stroke: #abcdef; fill:#abcdef"));
}

#[test]
fn current_color_is_replaced_in_style_element_text() {
    let page = FakePage::body(
        r#"<svg id="s"><style>.a { fill: currentColor; stroke: CurrentColor }</style><path class="a" fill="red"/></svg>"#,
    )
    .with_style("s", "color", "rgb(18, 52, 86)");
    let out = resolved(&page, "s");
    assert!(out.contains("<style>.a { fill: #123456; stroke: #123456 }</style>"), "{out}");
}

#[test]
fn missing_paint_is_inlined_from_computed_style() {
    let page = FakePage::body(r#"<svg id="s"><g fill="red"><circle id="c" r="2"/></g></svg>"#);
    let out = resolved(&page, "s");
    assert!(out.contains(r##"<circle id="c" r="2" fill="#ff0000" stroke="none"/>"##), "{out}");
    assert!(out.contains(r#"<g fill="red">"#), "groups are not paintable: {out}");
}

#[test]
fn portable_paint_attributes_are_left_alone() {
    let page = FakePage::body(r#"<svg id="s"><rect fill="teal" stroke="url(#g)"/></svg>"#);
    let out = resolved(&page, "s");
    assert!(out.contains(r#"<rect fill="teal" stroke="url(#g)"/>"#), "{out}");
}

#[test]
fn invalid_paint_attribute_is_replaced_by_computed_value() {
    let page = FakePage::body(r#"<svg id="s"><path id="p" fill="var(--brand)"/></svg>"#)
        .with_style("p", "fill", "rgb(0, 128, 0)");
    assert!(resolved(&page, "s").contains(r##"fill="#008000""##));
}

#[test]
fn unusable_computed_paint_falls_back_to_default() {
    let page = FakePage::body(r#"<svg id="s"><path id="p"/></svg>"#)
        .with_style("p", "fill", r##"url("#pattern")"##)
        .with_style("p", "stroke", "color-mix(in srgb, red, blue)");
    let out = resolved(&page, "s");
    assert!(out.contains(r##"fill="#000000""##), "{out}");
    assert!(out.contains(r##"stroke="#000000""##), "{out}");
}

#[test]
fn synthesized_elements_are_skipped() {
    let page = FakePage::body("<p></p>");
    let mut root = Fragment::new("svg");
    root.push(Fragment::new("path"));
    inline_computed_paint(&page, &mut root);
    assert_eq!(root.serialize(), "<svg><path/></svg>");
}

#[test]
fn live_document_is_untouched() {
    let page = FakePage::body(r#"<svg id="s" style="color:#123456"><path id="p" fill="currentColor"/></svg>"#);
    let before = page.document().clone_subtree(page.node("s")).unwrap().serialize();
    let _ = resolved(&page, "s");
    let after = page.document().clone_subtree(page.node("s")).unwrap().serialize();
    assert_eq!(before, after);
    assert_eq!(page.document().attr(page.node("p"), "fill"), Some("currentColor"));
}

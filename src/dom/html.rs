//! HTML page parsing into a [`Document`].
//!
//! Parsing is delegated to `scraper` (html5ever), which already applies the
//! foreign-content rules: SVG elements land in the SVG namespace with their
//! camel-cased tag and attribute names restored (`linearGradient`,
//! `viewBox`). Comments, doctypes and processing instructions are dropped.
//!
//! Attribute names keep their namespace prefix (`xlink:href`, `xml:space`),
//! so an element carrying both `href` and `xlink:href` stays well-formed.

use scraper::node::Element;
use scraper::{Html, Node};

use super::{Document, ElementData, NodeId, SVG_NAMESPACE};

/// Parse a full HTML page.
#[must_use]
pub fn parse_html(source: &str) -> Document {
    let parsed = Html::parse_document(source);
    let mut doc = Document::new();

    let mut stack = vec![(parsed.tree.root(), doc.root())];
    while let Some((node, parent)) = stack.pop() {
        let next_parent: Option<NodeId> = match node.value() {
            Node::Document | Node::Fragment => Some(parent),
            Node::Element(element) => {
                let mut data = ElementData::new(element.name(), &*element.name.ns == SVG_NAMESPACE);
                data.attrs = qualified_attrs(element);
                Some(doc.append_element(parent, data))
            }
            Node::Text(text) => {
                doc.append_text(parent, &**text);
                None
            }
            _ => None,
        };

        if let Some(next_parent) = next_parent {
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, next_parent));
            }
        }
    }

    doc
}

/// Attributes in source order, names written `prefix:local` when prefixed.
fn qualified_attrs(element: &Element) -> Vec<(String, String)> {
    element
        .attrs
        .iter()
        .map(|(name, value)| {
            let name = match &name.prefix {
                Some(prefix) => format!("{}:{}", &**prefix, &*name.local),
                None => name.local.to_string(),
            };
            (name, value.to_string())
        })
        .collect()
}

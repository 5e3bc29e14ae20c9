//! Markup serialization for [`Fragment`] trees.
//!
//! Output is XML: attribute values and text are escaped, childless elements
//! are written self-closing, and every opened element is closed.

use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use super::{Fragment, FragmentChild};

impl Fragment {
    /// Serialize this element and its subtree.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(256);
        write_element(&mut out, self);
        out
    }
}

fn write_element(out: &mut String, element: &Fragment) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape(value.as_str()));
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_child(out, child);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_child(out: &mut String, child: &FragmentChild) {
    match child {
        FragmentChild::Element(e) => write_element(out, e),
        FragmentChild::Text(text) => out.push_str(&partial_escape(text.as_str())),
    }
}

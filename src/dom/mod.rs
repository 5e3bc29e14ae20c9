//! Page document model.
//!
//! DESIGN
//! ======
//! The rendered page is held as an arena of nodes indexed by [`NodeId`].
//! Node ids are handed out in pre-order, so iterating the arena is a
//! document-order traversal. The arena is never mutated after construction:
//! anything that needs to change attributes for export works on an owned
//! [`Fragment`] cloned out of it, which leaves the live document untouched.

pub mod fragment;
pub mod html;
pub mod serialize;
pub mod style;

pub use fragment::{Fragment, FragmentChild};

/// Namespace URI of vector-graphic elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Namespace URI bound to the `xlink:` attribute prefix.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

// =============================================================================
// NODES
// =============================================================================

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag name, attributes, and namespace flag of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// `true` when the element lives in the SVG namespace.
    pub svg: bool,
}

impl ElementData {
    #[must_use]
    pub fn new(name: impl Into<String>, svg: bool) -> Self {
        Self { name: name.into(), attrs: Vec::new(), svg }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Attribute value by exact name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value, treating empty and whitespace-only values as absent.
    #[must_use]
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.name == tag
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Immutable-after-build page document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// An empty document holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![Node { parent: None, children: Vec::new(), data: NodeData::Document }] }
    }

    /// Parse an HTML page. See [`html::parse_html`].
    #[must_use]
    pub fn parse_html(source: &str) -> Self {
        html::parse_html(source)
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        self.push(parent, NodeData::Element(element))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeData::Text(text.into()))
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: Some(parent), children: Vec::new(), data });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Element data, or `None` for the root, text nodes, and unknown ids.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Nearest ancestor that is an element.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Direct children that are elements, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
    }

    /// Ancestors from the parent up to the root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |n| self.parent(*n))
    }

    /// `id` and every node below it, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Every element in the document, in document order.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        self.select(|_| true)
    }

    /// Elements matching `predicate`, in document order.
    pub fn select(&self, predicate: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(&predicate))
            .collect()
    }

    /// Elements with the given tag name, in document order.
    #[must_use]
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.select(|e| e.is(tag))
    }

    /// Concatenated text of every text node below `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Owned deep copy of the subtree rooted at element `id`.
    ///
    /// Every cloned element remembers the live node it came from, so computed
    /// style and geometry can still be read for it.
    #[must_use]
    pub fn clone_subtree(&self, id: NodeId) -> Option<Fragment> {
        let element = self.element(id)?;
        let mut fragment = Fragment::new(element.name.clone());
        fragment.attrs.clone_from(&element.attrs);
        fragment.origin = Some(id);
        for child in self.children(id) {
            if let Some(text) = self.text(*child) {
                fragment.children.push(FragmentChild::Text(text.to_owned()));
            } else if let Some(sub) = self.clone_subtree(*child) {
                fragment.children.push(FragmentChild::Element(sub));
            }
        }
        Some(fragment)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

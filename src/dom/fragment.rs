//! Owned, mutable element trees cloned out of a [`Document`](super::Document).

use super::NodeId;

/// An owned element with owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<FragmentChild>,
    /// Live node this element was cloned from. `None` for synthesized elements.
    pub origin: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentChild {
    Element(Fragment),
    Text(String),
}

impl Fragment {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attrs: Vec::new(), children: Vec::new(), origin: None }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    /// Builder form of [`Fragment::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn push(&mut self, child: Fragment) {
        self.children.push(FragmentChild::Element(child));
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Fragment> {
        self.children.iter().filter_map(|c| match c {
            FragmentChild::Element(e) => Some(e),
            FragmentChild::Text(_) => None,
        })
    }

    /// `true` when this element or any element below it matches.
    pub fn any(&self, predicate: &impl Fn(&Fragment) -> bool) -> bool {
        predicate(self) || self.child_elements().any(|child| child.any(predicate))
    }

    /// Visit this element and every element below it, pre-order.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Fragment)) {
        visit(self);
        for child in &mut self.children {
            if let FragmentChild::Element(e) = child {
                e.walk_mut(visit);
            }
        }
    }
}

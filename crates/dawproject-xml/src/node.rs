//! In-memory XML element tree.

use std::collections::BTreeMap;

/// One XML element with its attributes, text and child elements.
///
/// Attribute keys are unique. Children keep document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Concatenated, trimmed character data directly inside this element.
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder form of [`XmlNode::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder form of [`XmlNode::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.push_child(child);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// First child named `name`.
    pub fn find_child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// All children named `name`, in document order.
    pub fn find_children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute value, or `default` when absent.
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attribute(key).unwrap_or(default)
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Number of elements in this subtree, including `self`.
    pub fn element_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(XmlNode::element_count)
            .sum::<usize>()
    }
}

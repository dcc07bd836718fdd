//! An explicit in-memory markup tree with a single serialization step.
//!
//! Render operations build [`Node`] values instead of concatenating markup
//! strings; escaping happens exactly once, here, when the tree is written
//! out. Text nodes and attribute values are escaped with
//! [`crate::sanitize::escape_markup`], so upstream code only ever deals in
//! plain text.

use crate::sanitize::escape_markup;

/// Tags serialized without a closing pair.
const VOID_TAGS: [&str; 6] = ["img", "hr", "br", "meta", "link", "input"];

/// One node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element: tag, attributes in insertion order, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any prior value for the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            existing.1 = value;
        } else {
            self.attrs.push((name, value));
        }
        self
    }

    /// Append a class token to the `class` attribute.
    pub fn class(mut self, token: &str) -> Self {
        match self.attrs.iter_mut().find(|(key, _)| key == "class") {
            Some(existing) => {
                existing.1.push(' ');
                existing.1.push_str(token);
            }
            None => self.attrs.push(("class".to_string(), token.to_string())),
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a plain-text child; escaping is applied at serialization.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// Serialize the subtree to HTML in one step.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_markup(text)),
            Node::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_markup(value));
                    out.push('"');
                }
                out.push('>');
                if element.is_void() {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

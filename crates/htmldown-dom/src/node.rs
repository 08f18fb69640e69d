//! Owned document tree.
//!
//! Every element owns its children outright; there are no parent pointers
//! and no sharing, so a tree is dropped in one piece after rendering.

use crate::token::Attributes;
use crate::utilities::is_void;

/// Tag name of the synthetic root element
pub const DOCUMENT_TAG: &str = "#document";

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag name, attributes and children
    Element(Element),
    /// Entity-decoded character data
    Text(String),
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Lower-case tag name
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str, attributes: Attributes) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Append a child, merging adjacent text
    pub fn push(&mut self, child: Node) {
        if let Node::Text(text) = &child {
            if let Some(Node::Text(last)) = self.children.last_mut() {
                last.push_str(text);
                return;
            }
        }
        self.children.push(child);
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Reconstruct outer HTML. The document root has no markup of its own.
    pub fn outer_html(&self) -> String {
        if self.name == DOCUMENT_TAG {
            return self.inner_html();
        }
        let attrs = attributes_string(&self.attributes);
        let open = if attrs.is_empty() {
            format!("<{}>", self.name)
        } else {
            format!("<{} {}>", self.name, attrs)
        };
        if is_void(&self.name) {
            open
        } else {
            format!("{}{}</{}>", open, self.inner_html(), self.name)
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children.iter().map(Node::outer_html).collect()
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Node::Element(Element::new(tag_name, Attributes::new()))
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let attributes = attrs
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        Node::Element(Element::new(tag_name, attributes))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Node::Text(content.to_string())
    }

    /// Create the synthetic document root
    pub fn document() -> Self {
        Node::Element(Element::new(DOCUMENT_TAG, Attributes::new()))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Tag name for elements
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(|el| el.name.as_str())
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element()?.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.as_element().into_iter().flat_map(|el| el.children.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node. Text nodes cannot have children; the call is a no-op for them.
    pub fn add_child(&mut self, child: Node) {
        if let Node::Element(el) = self {
            el.push(child);
        }
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Node::Element(el) = self {
            el.attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(el) => el.text_content(),
        }
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        match self {
            Node::Text(text) => escape_html_text(text),
            Node::Element(el) => el.outer_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        match self {
            Node::Text(_) => String::new(),
            Node::Element(el) => el.inner_html(),
        }
    }
}

fn attributes_string(attrs: &Attributes) -> String {
    attrs
        .iter()
        .map(|(name, value)| {
            if value.is_empty() {
                name.clone()
            } else {
                format!("{}=\"{}\"", name, escape_html_attr(value))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

//! Tree construction from a token stream.
//!
//! The builder keeps a stack of open elements with the document root at the
//! bottom. Malformed markup never aborts construction:
//!
//! - an end tag closes the nearest open element with the same name, and
//!   implicitly closes everything opened after it;
//! - an end tag with no open match is ignored;
//! - whatever is still open at end of input is closed;
//! - past [`MAX_DEPTH`] open elements, start tags become empty leaves so the
//!   tree depth stays bounded.

use crate::entities::decode_entities;
use crate::node::{Element, Node, DOCUMENT_TAG};
use crate::token::{Attributes, Token};
use crate::utilities::is_void;

/// Maximum number of open elements below the root.
///
/// Rendering and dropping a tree recurse once per level, so the depth must
/// not be left to the input.
pub const MAX_DEPTH: usize = 128;

/// Build a document tree from `tokens`.
///
/// Total: every token sequence yields a tree rooted at a
/// [`DOCUMENT_TAG`](crate::DOCUMENT_TAG) element.
pub fn build<'a, I>(tokens: I) -> Node
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.feed(token);
    }
    builder.finish()
}

/// Incremental tree builder.
#[derive(Debug)]
pub struct TreeBuilder {
    // stack[0] is the document root and is never popped before `finish`
    stack: Vec<Element>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let root = Element::new(DOCUMENT_TAG, Attributes::new());
        Self { stack: vec![root] }
    }

    /// Number of currently open elements, excluding the root
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::StartTag { name, attributes } => {
                let element = Element::new(&name, attributes);
                if is_void(&name) {
                    self.append(Node::Element(element));
                } else if self.depth() >= MAX_DEPTH {
                    tracing::trace!(tag = %name, max = MAX_DEPTH, "nesting too deep, flattening element");
                    self.append(Node::Element(element));
                } else {
                    self.stack.push(element);
                }
            }
            Token::SelfClosingTag { name, attributes } => {
                self.append(Node::Element(Element::new(&name, attributes)));
            }
            Token::EndTag { name } => self.close(&name),
            Token::Text(raw) => {
                if !raw.is_empty() {
                    self.append(Node::Text(decode_entities(raw).into_owned()));
                }
            }
            Token::Comment(_) => {}
        }
    }

    /// Close all open elements and return the root.
    pub fn finish(mut self) -> Node {
        if self.depth() > 0 {
            tracing::trace!(open = self.depth(), "closing elements left open at end of input");
        }
        self.pop_to(1);
        Node::Element(self.stack.pop().unwrap_or_default())
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.push(node);
        }
    }

    fn close(&mut self, name: &str) {
        let found = self
            .stack
            .iter()
            .skip(1)
            .rposition(|el| el.name == name)
            .map(|i| i + 1);

        match found {
            Some(index) => {
                let closed = self.stack.len() - index;
                if closed > 1 {
                    tracing::trace!(tag = name, closed, "implicitly closing interleaved elements");
                }
                self.pop_to(index);
            }
            None => tracing::trace!(tag = name, "ignoring end tag with no open element"),
        }
    }

    /// Pop until only `len` elements remain, attaching each to its parent.
    fn pop_to(&mut self, len: usize) {
        while self.stack.len() > len.max(1) {
            if let Some(element) = self.stack.pop() {
                self.append(Node::Element(element));
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

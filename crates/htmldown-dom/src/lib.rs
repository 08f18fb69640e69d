//! # htmldown-dom
//!
//! The markup half of `htmldown`: a lazy tokenizer and a forgiving tree
//! builder that turn an HTML fragment into an owned [`Node`] tree.
//!
//! ```text
//! &str ──tokenize──▶ Token stream ──build──▶ Node tree
//! ```
//!
//! Construction is total. Unbalanced, interleaved and unterminated markup is
//! repaired locally by the builder; nothing here returns an error.
//!
//! ## Example
//!
//! ```rust
//! use htmldown_dom::{build, tokenize};
//!
//! let tree = build(tokenize("<p>Hello <em>World</em></p>"));
//! let p = tree.children().next().unwrap();
//! assert_eq!(p.tag_name(), Some("p"));
//! assert_eq!(p.text_content(), "Hello World");
//! ```

mod builder;
mod entities;
pub mod node;
mod token;
mod tokenizer;
mod utilities;

pub use builder::{build, TreeBuilder, MAX_DEPTH};
pub use entities::decode_entities;
pub use node::{Element, Node, DOCUMENT_TAG};
pub use token::{Attributes, Token};
pub use tokenizer::{tokenize, Tokenizer};
pub use utilities::{is_void, VOID_ELEMENTS};

/// Parse an HTML string into a document tree.
///
/// Shorthand for `build(tokenize(html))`.
///
/// # Example
///
/// ```rust
/// use htmldown_dom::parse_html;
///
/// let tree = parse_html("<b><i>text</b></i>");
/// assert_eq!(tree.text_content(), "text");
/// ```
pub fn parse_html(html: &str) -> Node {
    build(tokenize(html))
}

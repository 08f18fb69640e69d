//! # htmldown
//!
//! Convert HTML fragments to Markdown.
//!
//! Conversion is a three-stage pipeline. The markup is tokenized and built
//! into an owned tree by [`htmldown_dom`], then rendered depth-first with a
//! rule per element kind:
//!
//! ```text
//! HTML ──tokenize──▶ Tokens ──build──▶ Node tree ──render──▶ Markdown
//! ```
//!
//! Because every element is rendered with its children already converted,
//! nesting is handled structurally: a list inside a blockquote, a link inside
//! a table cell or emphasis around a line break all come out right.
//!
//! ## Example
//!
//! ```rust
//! let markdown = htmldown::convert("<h2>Title</h2><p>Some <em>text</em></p>");
//! assert_eq!(markdown, "## Title\n\nSome *text*");
//! ```
//!
//! ## Example (options)
//!
//! ```rust
//! use htmldown::{HtmldownService, Options};
//!
//! let options = Options {
//!     bullet_list_marker: '*',
//!     ..Default::default()
//! };
//! let service = HtmldownService::with_options(options).unwrap();
//! assert_eq!(service.convert("<ul><li>One</li></ul>"), "* One");
//! ```

mod options;
mod render;
mod service;
mod tag;

pub use htmldown_dom::{self as dom, parse_html, Node};
pub use options::{CodeBlockStyle, HeadingStyle, Options};
pub use service::HtmldownService;
pub use tag::TagKind;

/// Error type for htmldown operations
#[derive(Debug, thiserror::Error)]
pub enum HtmldownError {
    #[error("Invalid option {option}: {value:?}")]
    InvalidOption { option: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, HtmldownError>;

/// Convert an HTML string to Markdown with default options.
///
/// Total: every input yields some output.
pub fn convert(html: &str) -> String {
    HtmldownService::new().convert(html)
}

/// Render an already built tree to Markdown with default options.
///
/// ```rust
/// use htmldown::{parse_html, render};
///
/// let tree = parse_html("<ol><li>one</li><li>two</li></ol>");
/// assert_eq!(render(&tree), "1. one\n2. two");
/// ```
pub fn render(root: &Node) -> String {
    HtmldownService::new().convert_node(root)
}

//! HtmldownService - the main entry point for HTML to Markdown conversion.

use htmldown_dom::{parse_html, Node};

use crate::options::Options;
use crate::render::Renderer;
use crate::Result;

/// The main service for converting HTML to Markdown
#[derive(Debug, Clone, Default)]
pub struct HtmldownService {
    options: Options,
    keep_filters: Vec<String>,
    remove_filters: Vec<String>,
}

impl HtmldownService {
    /// Create a new HtmldownService with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an HtmldownService with custom options
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Convert an HTML string to Markdown.
    ///
    /// Never fails: malformed markup is repaired while building the tree
    /// and unknown elements render as their content.
    pub fn convert(&self, html: &str) -> String {
        tracing::debug!(input_len = html.len(), "Converting HTML");
        let tree = parse_html(html);
        let markdown = self.convert_node(&tree);
        tracing::debug!(output_len = markdown.len(), "Conversion completed");
        markdown
    }

    /// Convert an already built tree to Markdown
    pub fn convert_node(&self, node: &Node) -> String {
        Renderer {
            options: &self.options,
            keep: &self.keep_filters,
            remove: &self.remove_filters,
        }
        .render(node)
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Keep elements with this tag as HTML
    pub fn keep(&mut self, tag: &str) -> &mut Self {
        self.keep_filters.push(tag.to_ascii_lowercase());
        self
    }

    /// Remove elements with this tag, content included
    pub fn remove(&mut self, tag: &str) -> &mut Self {
        self.remove_filters.push(tag.to_ascii_lowercase());
        self
    }
}

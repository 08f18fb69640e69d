//! Configuration options for Markdown rendering

use crate::{HtmldownError, Result};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use ATX-style headings (prefixed with #)
    #[default]
    Atx,
    /// Use setext-style headings (underlined with = or -)
    /// Only works for h1 and h2, falls back to ATX for h3-h6
    Setext,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use fenced code blocks (```)
    #[default]
    Fenced,
    /// Use indented code blocks (4 spaces)
    Indented,
}

/// Options for Markdown rendering.
///
/// The defaults produce plain CommonMark with GFM tables and strikethrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Heading style (atx or setext)
    pub heading_style: HeadingStyle,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Strikethrough delimiter
    pub strike_delimiter: String,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emit the `language-*` class of a code block after the opening fence
    pub fence_language: bool,

    /// Horizontal rule string
    pub hr: String,

    /// Emit `title` attributes of links and images
    pub link_titles: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: '-',
            em_delimiter: '*',
            strong_delimiter: "**".to_string(),
            strike_delimiter: "~~".to_string(),
            code_block_style: CodeBlockStyle::Fenced,
            fence: "```".to_string(),
            fence_language: false,
            hr: "---".to_string(),
            link_titles: false,
        }
    }
}

impl Options {
    /// Check that every delimiter produces valid Markdown.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.bullet_list_marker, '-' | '*' | '+') {
            return Err(invalid("bullet_list_marker", self.bullet_list_marker));
        }
        if !matches!(self.em_delimiter, '*' | '_') {
            return Err(invalid("em_delimiter", self.em_delimiter));
        }
        if !matches!(self.strong_delimiter.as_str(), "**" | "__") {
            return Err(invalid("strong_delimiter", &self.strong_delimiter));
        }
        if !matches!(self.strike_delimiter.as_str(), "~~" | "~") {
            return Err(invalid("strike_delimiter", &self.strike_delimiter));
        }
        if !is_valid_fence(&self.fence) {
            return Err(invalid("fence", &self.fence));
        }
        if !is_valid_hr(&self.hr) {
            return Err(invalid("hr", &self.hr));
        }
        Ok(())
    }
}

fn invalid(option: &'static str, value: impl ToString) -> HtmldownError {
    HtmldownError::InvalidOption {
        option,
        value: value.to_string(),
    }
}

fn is_valid_fence(fence: &str) -> bool {
    let mut chars = fence.chars();
    match chars.next() {
        Some(c @ ('`' | '~')) => fence.len() >= 3 && chars.all(|x| x == c),
        _ => false,
    }
}

fn is_valid_hr(hr: &str) -> bool {
    let marks: Vec<char> = hr.chars().filter(|c| *c != ' ').collect();
    match marks.first().copied() {
        Some(c @ ('-' | '*' | '_')) => marks.len() >= 3 && marks.iter().all(|x| *x == c),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn test_alternative_delimiters_are_valid() {
        let options = Options {
            bullet_list_marker: '*',
            em_delimiter: '_',
            strong_delimiter: "__".to_string(),
            fence: "~~~~".to_string(),
            hr: "* * *".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_bullet() {
        let options = Options {
            bullet_list_marker: '#',
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            HtmldownError::InvalidOption { option: "bullet_list_marker", .. }
        ));
        assert_eq!(err.to_string(), "Invalid option bullet_list_marker: \"#\"");
    }

    #[test]
    fn test_invalid_fence() {
        for fence in ["``", "`~`", "'''", ""] {
            let options = Options {
                fence: fence.to_string(),
                ..Default::default()
            };
            assert!(options.validate().is_err(), "fence {fence:?} accepted");
        }
    }

    #[test]
    fn test_invalid_hr() {
        for hr in ["--", "-*-", "===", "   "] {
            let options = Options {
                hr: hr.to_string(),
                ..Default::default()
            };
            assert!(options.validate().is_err(), "hr {hr:?} accepted");
        }
    }
}

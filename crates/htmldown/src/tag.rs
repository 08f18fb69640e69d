//! Closed classification of element names into rendering rules.

/// How an element is rendered. Every tag name maps to exactly one kind;
/// names without a Markdown counterpart fall through to `Transparent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// h1-h6 with their level
    Heading(u8),
    Strong,
    Emphasis,
    Strikethrough,
    /// `code`; inside `pre` it is consumed by `Preformatted`
    Code,
    Preformatted,
    Link,
    Image,
    BlockQuote,
    UnorderedList,
    OrderedList,
    ListItem,
    Table,
    HorizontalRule,
    Paragraph,
    LineBreak,
    /// Children rendered in place, no markup of its own
    Transparent,
}

impl TagKind {
    /// Classify a lower-case tag name
    pub fn from_name(name: &str) -> Self {
        match name {
            "h1" => TagKind::Heading(1),
            "h2" => TagKind::Heading(2),
            "h3" => TagKind::Heading(3),
            "h4" => TagKind::Heading(4),
            "h5" => TagKind::Heading(5),
            "h6" => TagKind::Heading(6),
            "strong" | "b" => TagKind::Strong,
            "em" | "i" => TagKind::Emphasis,
            "del" | "s" | "strike" => TagKind::Strikethrough,
            "code" => TagKind::Code,
            "pre" => TagKind::Preformatted,
            "a" => TagKind::Link,
            "img" => TagKind::Image,
            "blockquote" => TagKind::BlockQuote,
            "ul" => TagKind::UnorderedList,
            "ol" => TagKind::OrderedList,
            "li" => TagKind::ListItem,
            "table" => TagKind::Table,
            "hr" => TagKind::HorizontalRule,
            "p" => TagKind::Paragraph,
            "br" => TagKind::LineBreak,
            _ => TagKind::Transparent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings() {
        assert_eq!(TagKind::from_name("h1"), TagKind::Heading(1));
        assert_eq!(TagKind::from_name("h6"), TagKind::Heading(6));
        assert_eq!(TagKind::from_name("h7"), TagKind::Transparent);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(TagKind::from_name("b"), TagKind::from_name("strong"));
        assert_eq!(TagKind::from_name("i"), TagKind::from_name("em"));
        assert_eq!(TagKind::from_name("s"), TagKind::Strikethrough);
        assert_eq!(TagKind::from_name("strike"), TagKind::Strikethrough);
    }

    #[test]
    fn test_transparent() {
        for name in ["div", "span", "section", "font", "custom-element", "td", "tr", "head", "noscript"] {
            assert_eq!(TagKind::from_name(name), TagKind::Transparent, "{name}");
        }
    }
}

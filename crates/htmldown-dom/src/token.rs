//! Low-level markup tokens.

use indexmap::IndexMap;

/// Attribute mapping of a tag, in source order.
///
/// Keys are lower-cased and unique; a duplicate attribute overwrites the
/// value of the first occurrence while keeping its position.
pub type Attributes = IndexMap<String, String>;

/// A token produced by the [`Tokenizer`](crate::Tokenizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<tag ...>`
    StartTag { name: String, attributes: Attributes },
    /// `</tag>`
    EndTag { name: String },
    /// `<tag ... />`
    SelfClosingTag { name: String, attributes: Attributes },
    /// Raw character data between tags, entities still encoded
    Text(&'a str),
    /// Body of a `<!-- ... -->` comment (only with `keep_comments`)
    Comment(&'a str),
}

impl<'a> Token<'a> {
    /// Tag name for tag tokens
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Token::StartTag { name, .. }
            | Token::EndTag { name }
            | Token::SelfClosingTag { name, .. } => Some(name),
            Token::Text(_) | Token::Comment(_) => None,
        }
    }

    /// Attribute value by (lower-case) name for start and self-closing tags
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Token::StartTag { attributes, .. } | Token::SelfClosingTag { attributes, .. } => {
                attributes.get(name).map(String::as_str)
            }
            _ => None,
        }
    }
}

//! Forgiving, lazy HTML tokenizer.
//!
//! Produces [`Token`]s one at a time from a borrowed string. It is not an
//! HTML5 state machine; it recognises the handful of constructs needed to
//! build a tree and turns everything it cannot make sense of into text.
//!
//! Known limitations (intentional):
//! - `script` and `style` are opaque: their content and the element itself
//!   are skipped entirely.
//! - Comments, `<!DOCTYPE>` and other `<!...>`/`<?...>` declarations are
//!   dropped unless comments are requested explicitly. A comment without
//!   `-->` is dropped up to the next `>` like a declaration.
//! - A `<` that does not start a recognisable construct, or a tag that is
//!   never closed with `>`, is emitted as literal text. A start tag
//!   interrupted by another `<` is text up to that `<`.

use memchr::memchr;

use crate::token::{Attributes, Token};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

// Only attempt matches at ASCII '<', which never occurs inside a multibyte
// UTF-8 sequence, so every slice boundary below is a char boundary.
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

/// Tokenize `input` with default settings.
///
/// The returned iterator is finite and holds no state beyond its position in
/// `input`; calling `tokenize` again starts over.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Lazy token iterator over a markup string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    keep_comments: bool,
    comment_end_missing: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            keep_comments: false,
            comment_end_missing: false,
        }
    }

    /// Emit `Token::Comment` for comments instead of dropping them
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Text from `start` up to (not including) the next `<` after `start`.
    fn literal_text(&mut self, start: usize) -> Token<'a> {
        let bytes = self.bytes();
        let end = memchr(b'<', &bytes[start + 1..])
            .map(|rel| start + 1 + rel)
            .unwrap_or(bytes.len());
        self.literal_until(start, end)
    }

    /// Text from `start` up to `end`, which is where a failed scan stopped.
    /// Never rescanning that range keeps tokenizing linear.
    fn literal_until(&mut self, start: usize, end: usize) -> Token<'a> {
        self.pos = end;
        Token::Text(&self.input[start..end])
    }

    fn rest_as_text(&mut self, start: usize) -> Token<'a> {
        self.literal_until(start, self.input.len())
    }

    /// Scan the construct starting at `<`. Returns `None` when it was
    /// consumed without producing a token.
    fn scan_markup(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        let bytes = self.bytes();
        let next = bytes.get(start + 1).copied();

        if self.input[start..].starts_with(COMMENT_START) {
            if let Some(token) = self.scan_comment(start) {
                return token;
            }
        }

        match next {
            Some(b'!') | Some(b'?') => self.skip_declaration(start),
            Some(b'/') if bytes.get(start + 2).is_some_and(u8::is_ascii_alphabetic) => {
                Some(self.scan_end_tag(start))
            }
            Some(c) if c.is_ascii_alphabetic() => self.scan_start_tag(start),
            _ => Some(self.literal_text(start)),
        }
    }

    /// `Some(token)` when the comment is terminated, `None` to fall back to
    /// declaration handling.
    fn scan_comment(&mut self, start: usize) -> Option<Option<Token<'a>>> {
        if self.comment_end_missing {
            return None;
        }
        let body_start = start + COMMENT_START.len();
        let Some(rel) = self.input[body_start..].find(COMMENT_END) else {
            // no later comment can be terminated either
            self.comment_end_missing = true;
            return None;
        };
        let body_end = body_start + rel;
        self.pos = body_end + COMMENT_END.len();
        Some(
            self.keep_comments
                .then(|| Token::Comment(&self.input[body_start..body_end])),
        )
    }

    /// `<!DOCTYPE ...>`, `<?xml ...?>` and unterminated comments are dropped
    /// up to the next `>`.
    fn skip_declaration(&mut self, start: usize) -> Option<Token<'a>> {
        match memchr(b'>', &self.bytes()[start..]) {
            Some(rel) => {
                self.pos = start + rel + 1;
                None
            }
            None => Some(self.rest_as_text(start)),
        }
    }

    fn scan_end_tag(&mut self, start: usize) -> Token<'a> {
        let bytes = self.bytes();
        let name_start = start + 2;
        let name_end = scan_name(bytes, name_start);

        match memchr(b'>', &bytes[name_end..]) {
            Some(rel) => {
                self.pos = name_end + rel + 1;
                Token::EndTag {
                    name: self.input[name_start..name_end].to_ascii_lowercase(),
                }
            }
            None => self.rest_as_text(start),
        }
    }

    fn scan_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        let bytes = self.bytes();
        let len = bytes.len();
        let name_start = start + 1;
        let name_end = scan_name(bytes, name_start);
        let name = self.input[name_start..name_end].to_ascii_lowercase();

        let mut attributes = Attributes::new();
        let mut self_closing = false;
        let mut k = name_end;

        loop {
            k = skip_whitespace(bytes, k);
            if k >= len {
                return Some(self.rest_as_text(start));
            }
            match bytes[k] {
                b'>' => {
                    k += 1;
                    break;
                }
                b'/' => {
                    if bytes.get(k + 1) == Some(&b'>') {
                        self_closing = true;
                        k += 2;
                        break;
                    }
                    k += 1;
                    continue;
                }
                // a new tag begins before this one was closed
                b'<' => return Some(self.literal_until(start, k)),
                _ => {}
            }

            let attr_start = k;
            while k < len && !is_attr_name_terminator(bytes[k]) {
                k += 1;
            }
            if attr_start == k {
                // stray '=' or quote where a name should be
                k += 1;
                continue;
            }
            let attr_name = self.input[attr_start..k].to_ascii_lowercase();

            k = skip_whitespace(bytes, k);
            let mut value = String::new();
            if k < len && bytes[k] == b'=' {
                k = skip_whitespace(bytes, k + 1);
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    let value_start = k + 1;
                    let Some(rel) = memchr(quote, &bytes[value_start..]) else {
                        // the value runs to the end of input
                        return Some(self.rest_as_text(start));
                    };
                    value = crate::decode_entities(&self.input[value_start..value_start + rel])
                        .into_owned();
                    k = value_start + rel + 1;
                } else {
                    let value_start = k;
                    while k < len && !is_unquoted_value_terminator(bytes[k]) {
                        if bytes[k] == b'/' && bytes.get(k + 1) == Some(&b'>') {
                            break;
                        }
                        k += 1;
                    }
                    value = crate::decode_entities(&self.input[value_start..k]).into_owned();
                }
            }
            attributes.insert(attr_name, value);
        }
        self.pos = k;

        if !self_closing && (name == "script" || name == "style") {
            self.skip_opaque_block(&name);
            return None;
        }

        Some(if self_closing {
            Token::SelfClosingTag { name, attributes }
        } else {
            Token::StartTag { name, attributes }
        })
    }

    /// Skip the content of a `script`/`style` block and its closing tag.
    fn skip_opaque_block(&mut self, name: &str) {
        let close_tag = if name == "script" {
            SCRIPT_CLOSE_TAG
        } else {
            STYLE_CLOSE_TAG
        };
        match find_close_tag(&self.bytes()[self.pos..], close_tag) {
            Some(rel_end) => self.pos += rel_end,
            None => {
                tracing::trace!(tag = name, "unterminated opaque block, discarding rest of input");
                self.pos = self.input.len();
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        while self.pos < self.input.len() {
            let bytes = self.bytes();
            if bytes[self.pos] != b'<' {
                let start = self.pos;
                let end = memchr(b'<', &bytes[start..])
                    .map(|rel| start + rel)
                    .unwrap_or(bytes.len());
                self.pos = end;
                return Some(Token::Text(&self.input[start..end]));
            }
            if let Some(token) = self.scan_markup() {
                return Some(token);
            }
        }
        None
    }
}

fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<')
}

fn is_unquoted_value_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'<'
}

fn scan_name(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_tag_name_char(bytes[i]) {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Find `close_tag` (case-insensitive) followed by optional whitespace and
/// `>`. Returns the offset just past the `>`.
fn find_close_tag(haystack: &[u8], close_tag: &[u8]) -> Option<usize> {
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= haystack.len() {
        i += memchr(b'<', &haystack[i..])?;
        if i + n > haystack.len() {
            return None;
        }
        if haystack[i..i + n].eq_ignore_ascii_case(close_tag) {
            let k = skip_whitespace(haystack, i + n);
            if haystack.get(k) == Some(&b'>') {
                return Some(k + 1);
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn start(name: &str, pairs: &[(&str, &str)]) -> Token<'static> {
        Token::StartTag {
            name: name.to_string(),
            attributes: attrs(pairs),
        }
    }

    fn end(name: &str) -> Token<'static> {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_simple_element() {
        let tokens: Vec<_> = tokenize("<p>Hello</p>").collect();
        assert_eq!(tokens, vec![start("p", &[]), Token::Text("Hello"), end("p")]);
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let tokens: Vec<_> = tokenize("<DIV CLASS=\"x\"></Div>").collect();
        assert_eq!(tokens, vec![start("div", &[("class", "x")]), end("div")]);
    }

    #[test]
    fn test_attribute_quoting_styles() {
        let tokens: Vec<_> =
            tokenize(r#"<a href='single' title="double" data-x=bare hidden>"#).collect();
        assert_eq!(
            tokens,
            vec![start(
                "a",
                &[
                    ("href", "single"),
                    ("title", "double"),
                    ("data-x", "bare"),
                    ("hidden", ""),
                ]
            )]
        );
    }

    #[test]
    fn test_attribute_value_may_contain_gt() {
        let tokens: Vec<_> = tokenize(r#"<img alt="a > b" src="x.png">"#).collect();
        assert_eq!(tokens[0].attr("alt"), Some("a > b"));
        assert_eq!(tokens[0].attr("src"), Some("x.png"));
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let tokens: Vec<_> = tokenize(r#"<a href="?a=1&amp;b=2">"#).collect();
        assert_eq!(tokens[0].attr("href"), Some("?a=1&b=2"));
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let tokens: Vec<_> = tokenize(r#"<p class="a" id="x" class="b">"#).collect();
        assert_eq!(tokens, vec![start("p", &[("class", "b"), ("id", "x")])]);
    }

    #[test]
    fn test_self_closing() {
        let tokens: Vec<_> = tokenize("<br/><img src=x.png />").collect();
        assert_eq!(
            tokens,
            vec![
                Token::SelfClosingTag {
                    name: "br".to_string(),
                    attributes: Attributes::new(),
                },
                Token::SelfClosingTag {
                    name: "img".to_string(),
                    attributes: attrs(&[("src", "x.png")]),
                },
            ]
        );
    }

    #[test]
    fn test_text_is_not_decoded() {
        let tokens: Vec<_> = tokenize("a &amp; b").collect();
        assert_eq!(tokens, vec![Token::Text("a &amp; b")]);
    }

    #[test]
    fn test_script_and_style_are_opaque() {
        let tokens: Vec<_> =
            tokenize("<p>Hi</p><SCRIPT type=\"x\">if (a < b) { x('</p>') }</Script ><style>p > a {}</style>")
                .collect();
        assert_eq!(tokens, vec![start("p", &[]), Token::Text("Hi"), end("p")]);
    }

    #[test]
    fn test_unterminated_script_discards_rest() {
        let tokens: Vec<_> = tokenize("a<script>alert(1)<p>b</p>").collect();
        assert_eq!(tokens, vec![Token::Text("a")]);
    }

    #[test]
    fn test_comments_dropped_by_default() {
        let tokens: Vec<_> = tokenize("a<!-- <b>not</b> -->b").collect();
        assert_eq!(tokens, vec![Token::Text("a"), Token::Text("b")]);
    }

    #[test]
    fn test_comments_kept_on_request() {
        let tokens: Vec<_> = Tokenizer::new("a<!--note-->").keep_comments(true).collect();
        assert_eq!(tokens, vec![Token::Text("a"), Token::Comment("note")]);
    }

    #[test]
    fn test_unterminated_comment() {
        let tokens: Vec<_> = tokenize("a<!-- open <p>b").collect();
        assert_eq!(tokens, vec![Token::Text("a"), Token::Text("b")]);

        let tokens: Vec<_> = tokenize("a<!-- open").collect();
        assert_eq!(tokens, vec![Token::Text("a"), Token::Text("<!-- open")]);
    }

    #[test]
    fn test_comment_after_unterminated_comment() {
        let tokens: Vec<_> = tokenize("<!-- x > a <!-- y > b").collect();
        assert_eq!(tokens, vec![Token::Text(" a "), Token::Text(" b")]);
    }

    #[test]
    fn test_doctype_is_dropped() {
        let tokens: Vec<_> = tokenize("<!DOCTYPE html><?xml version=\"1.0\"?>x").collect();
        assert_eq!(tokens, vec![Token::Text("x")]);
    }

    #[test]
    fn test_bare_less_than_is_text() {
        let tokens: Vec<_> = tokenize("1 < 2 <b>x</b>").collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text("1 "),
                Token::Text("< 2 "),
                start("b", &[]),
                Token::Text("x"),
                end("b"),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let tokens: Vec<_> = tokenize("text <a href=\"x").collect();
        assert_eq!(tokens, vec![Token::Text("text "), Token::Text("<a href=\"x")]);

        let tokens: Vec<_> = tokenize("</p").collect();
        assert_eq!(tokens, vec![Token::Text("</p")]);
    }

    #[test]
    fn test_start_tag_interrupted_by_tag() {
        let tokens: Vec<_> = tokenize("<a b <p>hi</p>").collect();
        assert_eq!(
            tokens,
            vec![Token::Text("<a b "), start("p", &[]), Token::Text("hi"), end("p")]
        );

        let tokens: Vec<_> = tokenize("<a href=x<b>y").collect();
        assert_eq!(
            tokens,
            vec![Token::Text("<a href=x"), start("b", &[]), Token::Text("y")]
        );
    }

    #[test]
    fn test_unclosed_tags_scan_in_linear_time() {
        for unit in ["<a b ", "<a x=\"", "</a ", "<!-- ", "<a x=y"] {
            let input = unit.repeat(40_000);
            let started = std::time::Instant::now();
            let text: String = tokenize(&input)
                .map(|token| match token {
                    Token::Text(text) => text,
                    other => panic!("unexpected token {other:?}"),
                })
                .collect();
            assert!(
                started.elapsed() < std::time::Duration::from_secs(5),
                "{unit:?} took {:?}",
                started.elapsed()
            );
            assert!(input.ends_with(&text));
        }
    }

    #[test]
    fn test_restartable() {
        let input = "<em>x</em>";
        let first: Vec<_> = tokenize(input).collect();
        let second: Vec<_> = tokenize(input).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn test_multibyte_text() {
        let tokens: Vec<_> = tokenize("<p>héllo wörld</p>").collect();
        assert_eq!(tokens[1], Token::Text("héllo wörld"));
    }
}

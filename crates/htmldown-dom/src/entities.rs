//! HTML entity decoding.
//!
//! Handles a small, fixed set of named references plus numeric character
//! references (`&#123;` and `&#x7B;`). Anything else is left as written.
//!
//! Uses Cow so text without a `&` is returned without copying.

use memchr::memchr;
use std::borrow::Cow;

// Longest supported name is "hellip"; numeric refs are bounded by U+10FFFF.
const MAX_REFERENCE_LEN: usize = 10;

/// Decode entity references in `input`.
///
/// Returns Borrowed if no `&` is present, Owned otherwise.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_slow(input))
}

fn decode_slow(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(rel) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + rel;
        out.push_str(&input[pos..amp]);

        match decode_reference(input, amp) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                pos = amp + consumed;
            }
            None => {
                out.push('&');
                pos = amp + 1;
            }
        }
    }
    out.push_str(&input[pos..]);
    out
}

/// Decode the reference starting at `amp`, returning the character and the
/// number of bytes consumed including `&` and `;`.
fn decode_reference(input: &str, amp: usize) -> Option<(char, usize)> {
    let rest = &input.as_bytes()[amp + 1..];
    let limit = rest.len().min(MAX_REFERENCE_LEN + 1);
    let semi = memchr(b';', &rest[..limit])?;
    let body = &input[amp + 1..amp + 1 + semi];

    let decoded = match body.strip_prefix('#') {
        Some(numeric) => decode_numeric(numeric)?,
        None => decode_named(body)?,
    };
    Some((decoded, semi + 2))
}

fn decode_numeric(digits: &str) -> Option<char> {
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok()?
        }
        None => return None,
    };
    // NUL is not a usable character in text
    if code == 0 {
        return None;
    }
    char::from_u32(code)
}

fn decode_named(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "times" => '×',
        _ => return None,
    };
    Some(c)
}

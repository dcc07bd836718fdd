//! Inline-text canonicalization for user-authored strings.
//!
//! Every display string coming out of the user document (bio, tag titles,
//! link names, spacer titles) passes through [`sanitize_inline_text`] before
//! it is attached to the markup tree: HTML entities are decoded first (so
//! double-encoded source text displays correctly once re-escaped by the
//! serializer), then `:name:` shortcodes are expanded from a fixed emoji
//! table. Escaping itself is centralized in the serializer (`markup`), not
//! here.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Longest entity body we will attempt to decode, e.g. `&#x1F600;`.
const MAX_ENTITY_BODY: usize = 10;

static SHORTCODES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn shortcode_table() -> &'static HashMap<&'static str, &'static str> {
    SHORTCODES.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert("smile", "\u{1F604}");
        map.insert("heart", "\u{2764}\u{FE0F}");
        map.insert("star", "\u{2B50}");
        map.insert("fire", "\u{1F525}");
        map.insert("rocket", "\u{1F680}");
        map.insert("wave", "\u{1F44B}");
        map.insert("thumbsup", "\u{1F44D}");
        map.insert("+1", "\u{1F44D}");
        map.insert("sparkles", "\u{2728}");
        map.insert("coffee", "\u{2615}");
        map.insert("laptop", "\u{1F4BB}");
        map.insert("link", "\u{1F517}");
        map.insert("mail", "\u{2709}\u{FE0F}");
        map.insert("music", "\u{1F3B5}");
        map.insert("camera", "\u{1F4F7}");
        map.insert("book", "\u{1F4D6}");
        map.insert("sun", "\u{2600}\u{FE0F}");
        map.insert("moon", "\u{1F319}");
        map.insert("check", "\u{2705}");
        map.insert("tada", "\u{1F389}");
        map
    })
}

/// Escape the five markup-unsafe characters (`& < > " '`).
///
/// Total: any input maps to a safe string, nothing ever fails.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode HTML entity references one level.
///
/// Single-pass: `&amp;lt;` decodes to `&lt;`, never all the way to `<`.
/// Supports the common named subset plus numeric references; anything
/// malformed is left verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos..];
        let mut consumed = false;
        // entity body sits between '&' and the next ';' within a short window
        if let Some(semi) = after[1..]
            .char_indices()
            .take(MAX_ENTITY_BODY + 1)
            .find(|&(_, ch)| ch == ';')
            .map(|(idx, _)| idx + 1)
        {
            if let Some(decoded) = decode_entity_body(&after[1..semi]) {
                out.push(decoded);
                rest = &after[semi + 1..];
                consumed = true;
            }
        }
        if !consumed {
            out.push('&');
            rest = &after[1..];
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity_body(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Expand `:name:` shortcodes from the fixed emoji table.
///
/// Token names are letters, digits, underscore, plus and hyphen, looked up
/// case-insensitively. Unknown tokens are left verbatim; a colon that does
/// not open a well-formed token passes through untouched.
pub fn expand_shortcodes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(':') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(':') {
            Some(close) => {
                let token = &after[..close];
                if !token.is_empty() && token.chars().all(is_shortcode_char) {
                    match shortcode_table().get(token.to_ascii_lowercase().as_str()) {
                        Some(emoji) => out.push_str(emoji),
                        None => {
                            out.push(':');
                            out.push_str(token);
                            out.push(':');
                        }
                    }
                    rest = &after[close + 1..];
                } else {
                    out.push(':');
                    rest = after;
                }
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_shortcode_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '+' || ch == '-'
}

/// Canonical pre-processing for any user-supplied display string.
///
/// Decode before expanding, so entity-encoded colons are normalized first.
pub fn sanitize_inline_text(text: &str) -> String {
    expand_shortcodes(&decode_entities(text))
}

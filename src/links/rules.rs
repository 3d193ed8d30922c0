// src/links/rules.rs
// =============================================================================
// Named pattern rules used to find and split links.
//
// This is deliberately pattern matching, not an HTML or URL grammar: the input
// is loosely structured email/landing-page markup with ad hoc query strings.
// Each rule is a regex compiled once (once_cell::Lazy) plus a small function
// so it can be tested on its own.
//
// Rust concepts:
// - static + Lazy: a global value built the first time it is used
// - Option<T>: "found / not found" without sentinel values
// - Byte offsets: regex matches report positions into the &str
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// `<a`, whitespace, any other attributes, then href="..." or href='...'.
// The regex crate has no backreferences, so "closing quote matches the
// opening one" is written as two alternatives. Values never cross a newline.
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a\s+(?:[^>]*?\s+)?href=(?:"([^"\n]*)"|'([^'\n]*)')"#)
        .expect("anchor href pattern is valid")
});

static SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("scheme pattern is valid")
});

static DEEP_LINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&?\$deep_link=true").expect("deep link pattern is valid"));

// `?lid=<id>` where the id is a literal or a `{{...}}` template placeholder
static LINK_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?lid=[^&]+").expect("link identifier pattern is valid"));

/// One href value found in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorHref<'a> {
    /// Byte offset of the first character of the value (just after the quote)
    pub offset: usize,
    pub value: &'a str,
}

/// Finds every anchor href in document order.
///
/// Malformed tags (unterminated quotes, `href` on another element) simply do
/// not match.
pub fn find_anchor_hrefs(document: &str) -> Vec<AnchorHref<'_>> {
    ANCHOR_HREF
        .captures_iter(document)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| AnchorHref {
            offset: m.start(),
            value: m.as_str(),
        })
        .collect()
}

/// Length of the `scheme://` prefix, if the string starts with one
pub fn scheme_prefix_len(href: &str) -> Option<usize> {
    SCHEME_PREFIX.find(href).map(|m| m.end())
}

/// Start of the deep-link block (including its leading `&` when present)
pub fn find_deep_link_block(href: &str) -> Option<usize> {
    DEEP_LINK_BLOCK.find(href).map(|m| m.start())
}

/// Location of a recognized link-identifier parameter
pub fn find_link_identifier(href: &str) -> Option<Range<usize>> {
    LINK_IDENTIFIER.find(href).map(|m| m.range())
}

/// True when the whole tracking block is exactly one link identifier.
///
/// Presentation code uses this to show the block as read-only.
pub fn is_link_identifier(param: &str) -> bool {
    matches!(find_link_identifier(param), Some(r) if r.start == 0 && r.end == param.len())
}

/// Position of the first `?` or `&` at or after `from`
pub fn query_boundary(href: &str, from: usize) -> Option<usize> {
    href.get(from..)?
        .find(['?', '&'])
        .map(|pos| from + pos)
}

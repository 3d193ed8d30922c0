// src/links/strategies.rs
// =============================================================================
// proptest generators for href values, shared by the engine's property tests.
// =============================================================================

use proptest::prelude::*;

/// Hrefs built from the pieces the decomposer looks for: a scheme and host,
/// an optional link identifier, a few query pairs and an optional deep-link
/// block. None of them contains a doubled separator.
pub fn structured_href() -> impl Strategy<Value = String> {
    (
        "(https?|ftp)://[a-z]{1,8}\\.test(/[a-z0-9]{0,6}){0,2}",
        "(\\?lid=[a-z0-9\\{\\}\\$_]{1,8})?",
        "([?&][a-z]{1,4}=[a-z0-9]{0,4}){0,3}",
        "([?&]?\\$deep_link=true(&utm_source=[a-z]{1,5})?)?",
    )
        .prop_map(|(main, lid, query, deep)| format!("{main}{lid}{query}{deep}"))
}

/// Anything a double-quoted attribute value can hold, plus structured hrefs
pub fn any_href() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^\"'\n<>]{0,40}",
        structured_href(),
    ]
}

/// A document with one anchor per href, separated by ordinary markup
pub fn document_with(hrefs: &[String]) -> String {
    hrefs
        .iter()
        .map(|href| format!("<p>text</p>\n<a class=\"btn\" href=\"{}\">link</a>\n", href))
        .collect()
}

// src/links/extract.rs
// =============================================================================
// This module finds anchor hrefs in markup and splits each one into parts.
//
// Every link is cut into three pieces that always glue back together into the
// exact original href:
//
//   https://x.test/go   ?lid=abc   &$deep_link=true&utm_source=email...
//   \_______________/   \______/   \__________________________________/
//       main_link    tracking_param            deep_link
//
// - deep_link: everything from the `$deep_link=true` marker to the end
// - tracking_param: the link identifier (`?lid=...`), or whatever query text
//   is left between the main link and the deep-link block
// - main_link: the rest
//
// Rust concepts:
// - Structs with owned Strings: each link owns its own copy of the parts
// - Option<String>: the tracking block may be absent
// - Result<T, E>: extraction can fail with a typed LinkError
// =============================================================================

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::LinkError;
use super::rules;

/// One anchor href found in the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLink {
    /// The href exactly as it appeared in the document. Never edited.
    pub full_url: String,
    /// The base link the user edits
    pub main_link: String,
    /// Link identifier or leftover query block, including its `?`/`&`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_param: Option<String>,
    /// Deep-link and UTM block, including its leading separator. Empty when off.
    pub deep_link: String,
    /// Byte offset of the href value in the document it was extracted from
    pub offset: usize,
}

impl DiscoveredLink {
    /// Main link + tracking block + deep-link block
    pub fn reconstruct(&self) -> String {
        let tracking = self.tracking_param.as_deref().unwrap_or("");
        let mut url =
            String::with_capacity(self.main_link.len() + tracking.len() + self.deep_link.len());
        url.push_str(&self.main_link);
        url.push_str(tracking);
        url.push_str(&self.deep_link);
        url
    }

    pub fn has_deep_link(&self) -> bool {
        !self.deep_link.is_empty()
    }

    /// True when the link already carries a query string before the deep-link
    /// block, so new parameters must be joined with `&` rather than `?`.
    pub fn has_query(&self) -> bool {
        self.main_link.contains('?')
            || self
                .tracking_param
                .as_deref()
                .is_some_and(|t| t.contains('?'))
    }
}

/// Extracts every anchor href from `document`, in document order.
///
/// Blank input and documents without anchors are errors rather than an empty
/// list, so callers can tell the user what went wrong.
pub fn extract(document: &str) -> Result<Vec<DiscoveredLink>, LinkError> {
    if document.trim().is_empty() {
        return Err(LinkError::EmptyInput);
    }

    let links: Vec<DiscoveredLink> = rules::find_anchor_hrefs(document)
        .into_iter()
        .map(|href| {
            let mut link = decompose(href.value);
            link.offset = href.offset;
            link
        })
        .collect();

    if links.is_empty() {
        return Err(LinkError::NoLinksFound);
    }

    debug!("extracted {} link(s)", links.len());
    Ok(links)
}

/// Splits a single href into main link, tracking block and deep-link block.
///
/// The returned link has offset 0; `extract` fills in the real position.
pub fn decompose(href: &str) -> DiscoveredLink {
    // The deep-link block is suffix-anchored and found first, with or
    // without a scheme in front of it.
    let (head, deep_link) = match rules::find_deep_link_block(href) {
        Some(start) => href.split_at(start),
        None => (href, ""),
    };

    let (main_link, tracking_param) = split_tracking(head);

    DiscoveredLink {
        full_url: href.to_string(),
        main_link: main_link.to_string(),
        tracking_param: tracking_param.map(str::to_string),
        deep_link: deep_link.to_string(),
        offset: 0,
    }
}

// Splits the part before the deep-link block into main link and tracking
// block. Nothing is dropped: main + tracking == head.
fn split_tracking(head: &str) -> (&str, Option<&str>) {
    let Some(scheme_len) = rules::scheme_prefix_len(head) else {
        // mailto:, relative paths, anchors, template-only hrefs...
        return (head, None);
    };

    let split_at = match rules::find_link_identifier(head) {
        Some(range) => Some(range.start),
        None => rules::query_boundary(head, scheme_len),
    };

    match split_at {
        Some(pos) if pos < head.len() => {
            let (main, tracking) = head.split_at(pos);
            (main, Some(tracking))
        }
        _ => (head, None),
    }
}

// src/links/recompose.rs
// =============================================================================
// This module writes edited links back into the original document.
//
// Two strategies:
// - Substring: every literal occurrence of a link's original href is replaced
//   by its reconstructed URL, link by link, on the progressively updated text.
//   Unedited links are skipped, so two anchors with the same href both get the
//   edit of the first *edited* link among them.
// - Position: each link only rewrites the href at the offset it was found at,
//   so identical hrefs stay independent.
//
// Everything outside the replaced hrefs is copied through verbatim.
// =============================================================================

use log::debug;
use serde::{Deserialize, Serialize};

use super::extract::DiscoveredLink;

/// How edited links are substituted into the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceStrategy {
    #[default]
    Substring,
    Position,
}

impl ReplaceStrategy {
    pub fn apply(self, document: &str, links: &[DiscoveredLink]) -> String {
        match self {
            ReplaceStrategy::Substring => recompose(document, links),
            ReplaceStrategy::Position => recompose_by_position(document, links),
        }
    }
}

/// Replaces every occurrence of each link's original href with its
/// reconstructed URL. A href that no longer occurs is skipped.
pub fn recompose(document: &str, links: &[DiscoveredLink]) -> String {
    let mut content = document.to_string();

    for link in links {
        // An empty href would match everywhere
        if link.full_url.is_empty() {
            continue;
        }
        if !content.contains(&link.full_url) {
            debug!("href not found in document, skipping: {}", link.full_url);
            continue;
        }
        let reconstructed = link.reconstruct();
        // Unedited: leave the text (and any duplicate of it) for later links
        if reconstructed != link.full_url {
            content = content.replace(&link.full_url, &reconstructed);
        }
    }

    content
}

/// Rewrites each link only at the offset it was extracted from.
///
/// A link whose offset no longer holds its original href (the document was
/// changed, or the offset is stale) is skipped.
pub fn recompose_by_position(document: &str, links: &[DiscoveredLink]) -> String {
    // Walk the document front to back, whatever order the list is in
    let mut ordered: Vec<&DiscoveredLink> = links.iter().collect();
    ordered.sort_by_key(|link| link.offset);

    let mut content = String::with_capacity(document.len());
    // Everything before `cursor` has already been copied into `content`
    let mut cursor = 0;

    for link in ordered {
        let end = link.offset + link.full_url.len();
        let still_there = link.offset >= cursor
            && document.get(link.offset..end) == Some(link.full_url.as_str());
        if !still_there {
            debug!(
                "href not found at offset {}, skipping: {}",
                link.offset, link.full_url
            );
            continue;
        }
        // Text between the previous href and this one, then the new href
        content.push_str(&document[cursor..link.offset]);
        content.push_str(&link.reconstruct());
        cursor = end;
    }

    // Whatever follows the last href
    content.push_str(&document[cursor..]);
    content
}

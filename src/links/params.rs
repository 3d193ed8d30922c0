// src/links/params.rs
// =============================================================================
// Deep-link parameter set and the deep-link toggle.
//
// A deep-link block looks like:
//   &$deep_link=true&$follow_redirect=true&utm_source=email&utm_medium=crm&utm_campaign=promo
//
// The same parameter set is shared by every link in a session: toggling
// deep linking on for a link stamps the current set onto it.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::extract::DiscoveredLink;

/// Settings used to build a deep-link block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepLinkParams {
    pub deep_link: bool,
    pub follow_redirect: bool,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
}

impl Default for DeepLinkParams {
    fn default() -> Self {
        Self {
            deep_link: true,
            follow_redirect: true,
            utm_source: "email".to_string(),
            utm_medium: "crm".to_string(),
            utm_campaign: "{{campaign.${name}}}".to_string(),
        }
    }
}

/// A single-field edit of the parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamUpdate {
    DeepLink(bool),
    FollowRedirect(bool),
    UtmSource(String),
    UtmMedium(String),
    UtmCampaign(String),
}

impl DeepLinkParams {
    /// Serializes the set as a block starting with `separator` (`&`, `?` or
    /// nothing when the link already ends in one)
    pub fn serialize(&self, separator: &str) -> String {
        format!(
            "{separator}$deep_link={}&$follow_redirect={}&utm_source={}&utm_medium={}&utm_campaign={}",
            self.deep_link, self.follow_redirect, self.utm_source, self.utm_medium, self.utm_campaign
        )
    }

    /// Reads a parameter set back out of an existing deep-link block.
    ///
    /// Keys missing from the block keep their value from `base`; unknown keys
    /// are ignored. Flags that are not `true`/`false` also keep `base`'s value.
    pub fn from_block(block: &str, base: &DeepLinkParams) -> Self {
        let mut params = base.clone();

        // "&$deep_link=true&utm_source=email" -> [("$deep_link", "true"), ("utm_source", "email")]
        let pairs = block
            .trim_start_matches(['&', '?'])
            .split('&')
            .filter_map(|pair| pair.split_once('='));

        for (key, value) in pairs {
            match key {
                "$deep_link" => {
                    if let Ok(flag) = value.parse() {
                        params.deep_link = flag;
                    }
                }
                "$follow_redirect" => {
                    if let Ok(flag) = value.parse() {
                        params.follow_redirect = flag;
                    }
                }
                "utm_source" => params.utm_source = value.to_string(),
                "utm_medium" => params.utm_medium = value.to_string(),
                "utm_campaign" => params.utm_campaign = value.to_string(),
                _ => {}
            }
        }

        params
    }

    /// Applies one user edit. Campaign tags are reduced to `[A-Za-z0-9_-]`.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::DeepLink(flag) => self.deep_link = flag,
            ParamUpdate::FollowRedirect(flag) => self.follow_redirect = flag,
            ParamUpdate::UtmSource(value) => self.utm_source = sanitize_tag(&value),
            ParamUpdate::UtmMedium(value) => self.utm_medium = sanitize_tag(&value),
            ParamUpdate::UtmCampaign(value) => self.utm_campaign = sanitize_tag(&value),
        }
    }
}

/// Keeps only ASCII letters, digits, `_` and `-`
pub fn sanitize_tag(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Turns deep linking off when the link has a block, on when it does not.
///
/// Separators are never doubled or lost across an off/on cycle:
/// - off: a block written as `?$deep_link=...` (no `&` of its own) also takes
///   the `?` in front of it, so no dangling separator is left behind
/// - on: no separator if the link already ends in `?` or `&`, `&` if it
///   already has a query string, `?` otherwise
pub fn toggle_deep_link(link: &DiscoveredLink, params: &DeepLinkParams) -> DiscoveredLink {
    let mut toggled = link.clone();
    if link.has_deep_link() {
        toggled.deep_link.clear();
        if link.deep_link.starts_with('$') {
            drop_trailing_separator(&mut toggled);
        }
    } else {
        toggled.deep_link = params.serialize(block_separator(link));
    }
    toggled
}

// What has to go between the link as it stands and a new deep-link block
fn block_separator(link: &DiscoveredLink) -> &'static str {
    // Last character of main_link + tracking_param
    let last = link
        .tracking_param
        .as_deref()
        .and_then(|t| t.chars().last())
        .or_else(|| link.main_link.chars().last());

    match last {
        Some('?' | '&') => "",
        _ if link.has_query() => "&",
        _ => "?",
    }
}

// Removes one trailing `?`/`&` from the end of main_link + tracking_param
fn drop_trailing_separator(link: &mut DiscoveredLink) {
    match link.tracking_param.take() {
        Some(mut tracking) => {
            pop_separator(&mut tracking);
            // A tracking block that was only the separator disappears
            link.tracking_param = Some(tracking).filter(|t| !t.is_empty());
        }
        None => pop_separator(&mut link.main_link),
    }
}

fn pop_separator(s: &mut String) {
    if s.ends_with(['?', '&']) {
        s.pop();
    }
}

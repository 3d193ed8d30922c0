// src/session.rs
// =============================================================================
// An editing session: one document, its extracted links, and the shared
// deep-link parameters.
//
// The session is an ordinary value owned by the caller (the CLI or the
// interactive loop). Every operation either succeeds or returns a LinkError
// and leaves the session exactly as it was, so the user can fix the input and
// try again.
//
// The updated document is never stored: it is recomputed from the original
// content and the current links whenever it is asked for.
// =============================================================================

use log::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::links::{self, DeepLinkParams, DiscoveredLink, LinkError, ParamUpdate};

/// Which part of a link an edit replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEdit {
    /// Must be an absolute URL
    MainLink(String),
    TrackingParam(Option<String>),
    DeepLink(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    original_content: String,
    links: Vec<DiscoveredLink>,
    params: Option<DeepLinkParams>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            original_content: String::new(),
            links: Vec::new(),
            params: None,
        }
    }

    /// Replaces the document. Links from the previous document are dropped.
    pub fn load(&mut self, content: impl Into<String>) {
        self.original_content = content.into();
        self.links.clear();
    }

    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    pub fn links(&self) -> &[DiscoveredLink] {
        &self.links
    }

    /// The shared deep-link parameters, once initialized
    pub fn params(&self) -> Option<&DeepLinkParams> {
        self.params.as_ref()
    }

    /// Extracts links from the loaded document and returns how many were found.
    ///
    /// On failure nothing is committed. With `auto_populate_params` on, the
    /// first existing deep-link block seeds the parameter set if none exists.
    pub fn extract(&mut self) -> Result<usize, LinkError> {
        // Extract into a local first so a failure leaves self untouched
        let found = links::extract(&self.original_content)?;

        if self.settings.auto_populate_params && self.params.is_none() {
            // Only the first deep-linked anchor is used as the template
            if let Some(block) = found.iter().find(|l| l.has_deep_link()) {
                debug!("seeding deep-link parameters from {}", block.full_url);
                // Keys the block leaves out come from the [deep_link] config table
                self.params = Some(DeepLinkParams::from_block(
                    &block.deep_link,
                    &self.settings.deep_link,
                ));
            }
        }

        self.links = found;
        info!("{} link(s) extracted", self.links.len());
        Ok(self.links.len())
    }

    /// Replaces one field of one link
    pub fn edit_link(&mut self, index: usize, edit: LinkEdit) -> Result<(), LinkError> {
        // Validate before borrowing the link so a bad URL changes nothing
        if let LinkEdit::MainLink(value) = &edit {
            validate_main_link(value)?;
        }

        let link = self.link_mut(index)?;
        match edit {
            LinkEdit::MainLink(value) => link.main_link = value,
            // An empty tracking value removes the block
            LinkEdit::TrackingParam(value) => {
                link.tracking_param = value.filter(|v| !v.is_empty())
            }
            LinkEdit::DeepLink(value) => link.deep_link = value,
        }
        Ok(())
    }

    /// Adds or removes the deep-link block of one link
    pub fn toggle_deep_link(&mut self, index: usize) -> Result<(), LinkError> {
        let current = self.link_mut(index)?.clone();
        // First toggle of the session falls back to the configured set
        let params = self
            .params
            .get_or_insert_with(|| self.settings.deep_link.clone());
        let toggled = links::toggle_deep_link(&current, params);
        self.links[index] = toggled;
        Ok(())
    }

    /// Drops a link from the list. Its anchor is left as it was.
    pub fn remove_link(&mut self, index: usize) -> Result<DiscoveredLink, LinkError> {
        if index >= self.links.len() {
            return Err(LinkError::UnknownLink(index));
        }
        Ok(self.links.remove(index))
    }

    /// Edits the shared parameter set (initializing it from settings first).
    ///
    /// Links that already carry a block keep it; the new values apply the
    /// next time deep linking is toggled on.
    pub fn update_param(&mut self, update: ParamUpdate) {
        self.params
            .get_or_insert_with(|| self.settings.deep_link.clone())
            .apply(update);
    }

    /// The original document with every link's current parts substituted in
    pub fn updated_content(&self) -> String {
        // Substring or position replacement, as configured
        self.settings
            .replace_strategy
            .apply(&self.original_content, &self.links)
    }

    /// Back to an empty session. Settings are kept.
    pub fn reset(&mut self) {
        self.original_content.clear();
        self.links.clear();
        self.params = None;
    }

    fn link_mut(&mut self, index: usize) -> Result<&mut DiscoveredLink, LinkError> {
        self.links
            .get_mut(index)
            .ok_or(LinkError::UnknownLink(index))
    }
}

// Only absolute URLs are accepted as a main link
fn validate_main_link(value: &str) -> Result<(), LinkError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| LinkError::InvalidUrlEdit {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::ReplaceStrategy;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"<a href="https://x.test/go?lid=abc123">Go</a>
<a href="https://x.test/app?lid=def&$deep_link=true&$follow_redirect=false&utm_source=push&utm_medium=app&utm_campaign=launch">App</a>"#;

    fn loaded(doc: &str) -> Session {
        let mut session = Session::new(Settings::default());
        session.load(doc);
        session.extract().unwrap();
        session
    }

    #[test]
    fn test_extract_seeds_params_from_first_deep_link() {
        let session = loaded(DOC);
        let params = session.params().unwrap();
        assert!(!params.follow_redirect);
        assert_eq!(params.utm_source, "push");
        assert_eq!(params.utm_campaign, "launch");
    }

    #[test]
    fn test_seeded_params_fill_gaps_from_config() {
        let mut session = Session::new(Settings {
            deep_link: DeepLinkParams {
                utm_medium: "newsletter".to_string(),
                utm_campaign: "autumn".to_string(),
                ..DeepLinkParams::default()
            },
            ..Settings::default()
        });
        session.load(r#"<a href="https://x.test/go?lid=1&$deep_link=true&utm_source=push">Go</a>"#);
        session.extract().unwrap();

        let params = session.params().unwrap();
        // Present in the document's block
        assert_eq!(params.utm_source, "push");
        // Missing from the block, taken from the configured set
        assert_eq!(params.utm_medium, "newsletter");
        assert_eq!(params.utm_campaign, "autumn");
    }

    #[test]
    fn test_extract_without_auto_populate() {
        let mut session = Session::new(Settings {
            auto_populate_params: false,
            ..Settings::default()
        });
        session.load(DOC);
        session.extract().unwrap();
        assert_eq!(session.params(), None);
    }

    #[test]
    fn test_failed_extract_leaves_session_usable() {
        let mut session = loaded(DOC);
        session.load("<p>nothing</p>");
        assert_eq!(session.extract(), Err(LinkError::NoLinksFound));
        assert!(session.links().is_empty());

        // And the session is still usable afterwards
        session.load(DOC);
        assert_eq!(session.extract(), Ok(2));
    }

    #[test]
    fn test_extract_empty_input() {
        let mut session = Session::new(Settings::default());
        session.load("   ");
        assert_eq!(session.extract(), Err(LinkError::EmptyInput));
    }

    #[test]
    fn test_invalid_main_link_is_rejected() {
        let mut session = loaded(DOC);
        let before = session.links().to_vec();

        let result = session.edit_link(0, LinkEdit::MainLink("not a url".to_string()));
        assert!(matches!(result, Err(LinkError::InvalidUrlEdit { .. })));
        assert_eq!(session.links(), before.as_slice());
        assert_eq!(session.updated_content(), DOC);
    }

    #[test]
    fn test_edit_main_link_updates_content() {
        let mut session = loaded(DOC);
        session
            .edit_link(0, LinkEdit::MainLink("https://x.test/new".to_string()))
            .unwrap();

        assert!(session
            .updated_content()
            .contains(r#"href="https://x.test/new?lid=abc123""#));
        // The other link is untouched
        assert_eq!(session.links()[1].main_link, "https://x.test/app");
        assert_eq!(session.original_content(), DOC);
    }

    #[test]
    fn test_edit_tracking_and_deep_link_fields() {
        let mut session = loaded(DOC);
        session
            .edit_link(0, LinkEdit::TrackingParam(Some(String::new())))
            .unwrap();
        session
            .edit_link(1, LinkEdit::DeepLink("&utm_source=sms".to_string()))
            .unwrap();

        assert_eq!(session.links()[0].tracking_param, None);
        assert_eq!(
            session.links()[1].reconstruct(),
            "https://x.test/app?lid=def&utm_source=sms"
        );
    }

    #[test]
    fn test_unknown_link_index() {
        let mut session = loaded(DOC);
        assert_eq!(session.toggle_deep_link(5), Err(LinkError::UnknownLink(5)));
        assert_eq!(
            session.edit_link(2, LinkEdit::DeepLink(String::new())),
            Err(LinkError::UnknownLink(2))
        );
        assert!(session.remove_link(9).is_err());
    }

    #[test]
    fn test_toggle_uses_seeded_params() {
        let mut session = loaded(DOC);
        session.toggle_deep_link(0).unwrap();
        assert_eq!(
            session.links()[0].reconstruct(),
            "https://x.test/go?lid=abc123&$deep_link=true&$follow_redirect=false&utm_source=push&utm_medium=app&utm_campaign=launch"
        );
    }

    #[test]
    fn test_toggle_initializes_params_from_settings() {
        let mut session = loaded(r#"<a href="https://x.test/go">Go</a>"#);
        assert_eq!(session.params(), None);

        session.toggle_deep_link(0).unwrap();
        assert_eq!(session.params(), Some(&DeepLinkParams::default()));
        assert_eq!(
            session.updated_content(),
            r#"<a href="https://x.test/go?$deep_link=true&$follow_redirect=true&utm_source=email&utm_medium=crm&utm_campaign={{campaign.${name}}}">Go</a>"#
        );
    }

    #[test]
    fn test_update_param_applies_on_next_toggle() {
        let mut session = loaded(r#"<a href="https://x.test/go?lid=1">Go</a>"#);
        session.update_param(ParamUpdate::UtmCampaign("winter".to_string()));
        session.toggle_deep_link(0).unwrap();
        assert!(session.links()[0].deep_link.ends_with("utm_campaign=winter"));
    }

    #[test]
    fn test_remove_link_keeps_anchor_verbatim() {
        let mut session = loaded(DOC);
        session.toggle_deep_link(1).unwrap();
        let removed = session.remove_link(1).unwrap();
        assert_eq!(removed.main_link, "https://x.test/app");
        assert_eq!(session.updated_content(), DOC);
    }

    #[test]
    fn test_position_strategy_keeps_duplicates_independent() {
        let doc = r#"<a href="https://x.test/a?lid=1">1</a><a href="https://x.test/a?lid=1">2</a>"#;
        let mut session = Session::new(Settings {
            replace_strategy: ReplaceStrategy::Position,
            ..Settings::default()
        });
        session.load(doc);
        session.extract().unwrap();
        session
            .edit_link(1, LinkEdit::MainLink("https://x.test/b".to_string()))
            .unwrap();

        assert_eq!(
            session.updated_content(),
            r#"<a href="https://x.test/a?lid=1">1</a><a href="https://x.test/b?lid=1">2</a>"#
        );
    }

    #[test]
    fn test_reset() {
        let mut session = loaded(DOC);
        session.reset();
        assert_eq!(session.original_content(), "");
        assert!(session.links().is_empty());
        assert_eq!(session.params(), None);
        assert_eq!(session.updated_content(), "");
    }
}

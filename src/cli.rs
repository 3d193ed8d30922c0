// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - extract: list the links of a document and how each one splits
// - rewrite: apply edits given as flags and print the updated document
// - edit:    open an interactive editing session
//
// Link numbers on the command line are 1-based, the way they are printed.
// The session works with 0-based indexes, so we convert at this boundary.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::links::{LinkError, ParamUpdate, ReplaceStrategy};
use crate::session::{LinkEdit, Session};

#[derive(Parser, Debug)]
#[command(
    name = "linksmith",
    version = "0.1.0",
    about = "Extract, edit and rewrite the links of an HTML document",
    long_about = "linksmith finds every <a href> in a piece of HTML, splits each link into its main URL, \
                  tracking parameter and deep-link block, lets you edit those parts, and writes them \
                  back into the document without touching anything else."
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./linksmith.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read the document from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// HTML file to read, or "-" for stdin (the default)
    pub input: Option<String>,

    /// Fetch the document from this URL instead of a file
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the links found in a document
    ///
    /// Example: linksmith extract newsletter.html --json
    Extract {
        #[command(flatten)]
        source: InputArgs,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Apply edits to the links and print the updated document
    ///
    /// Example: linksmith rewrite mail.html --set-main 1=https://shop.test/new --toggle-deep 2
    Rewrite {
        #[command(flatten)]
        source: InputArgs,

        #[command(flatten)]
        edits: RewriteArgs,

        /// Write the updated document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Edit the links of a document interactively
    Edit {
        #[command(flatten)]
        source: InputArgs,
    },
}

/// Edits applied by the rewrite subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct RewriteArgs {
    /// Replace a main link: N=URL (repeatable)
    #[arg(long = "set-main", value_name = "N=URL", value_parser = parse_numbered)]
    pub set_main: Vec<(usize, String)>,

    /// Replace a tracking parameter block: N=VALUE, empty VALUE removes it (repeatable)
    #[arg(long = "set-tracking", value_name = "N=VALUE", value_parser = parse_numbered)]
    pub set_tracking: Vec<(usize, String)>,

    /// Add or remove the deep-link block of link N (repeatable)
    #[arg(long = "toggle-deep", value_name = "N", value_parser = parse_link_number)]
    pub toggle_deep: Vec<usize>,

    /// Drop link N from editing; its anchor is left as it was (repeatable)
    #[arg(long, value_name = "N", value_parser = parse_link_number)]
    pub remove: Vec<usize>,

    /// utm_source used for new deep-link blocks
    #[arg(long)]
    pub utm_source: Option<String>,

    /// utm_medium used for new deep-link blocks
    #[arg(long)]
    pub utm_medium: Option<String>,

    /// utm_campaign used for new deep-link blocks
    #[arg(long)]
    pub utm_campaign: Option<String>,

    /// Set $follow_redirect=false in new deep-link blocks
    #[arg(long)]
    pub no_follow_redirect: bool,

    /// Rewrite each anchor at its own position, so identical hrefs stay independent
    #[arg(long)]
    pub by_position: bool,
}

impl RewriteArgs {
    /// --by-position overrides the configured strategy
    pub fn strategy(&self, configured: ReplaceStrategy) -> ReplaceStrategy {
        if self.by_position {
            ReplaceStrategy::Position
        } else {
            configured
        }
    }

    /// Applies the edits to an extracted session.
    ///
    /// Parameter changes go first so toggles pick them up. Removals go last,
    /// highest number first, so link numbers always refer to the extracted list.
    pub fn apply_to(&self, session: &mut Session) -> Result<(), LinkError> {
        let updates = [
            self.utm_source.clone().map(ParamUpdate::UtmSource),
            self.utm_medium.clone().map(ParamUpdate::UtmMedium),
            self.utm_campaign.clone().map(ParamUpdate::UtmCampaign),
            self.no_follow_redirect
                .then_some(ParamUpdate::FollowRedirect(false)),
        ];
        for update in updates.into_iter().flatten() {
            session.update_param(update);
        }

        for &index in &self.toggle_deep {
            session.toggle_deep_link(index)?;
        }
        for (index, url) in &self.set_main {
            session.edit_link(*index, LinkEdit::MainLink(url.clone()))?;
        }
        for (index, value) in &self.set_tracking {
            session.edit_link(*index, LinkEdit::TrackingParam(Some(value.clone())))?;
        }

        let mut removals = self.remove.clone();
        removals.sort_unstable();
        removals.dedup();
        for index in removals.into_iter().rev() {
            session.remove_link(index)?;
        }

        Ok(())
    }
}

/// Parses a 1-based link number into a 0-based index
pub fn parse_link_number(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a link number (1, 2, 3...)", s)),
    }
}

// "N=VALUE" with a 1-based N. The value may itself contain '='.
fn parse_numbered(s: &str) -> Result<(usize, String), String> {
    let (number, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got '{}'", s))?;
    Ok((parse_link_number(number)?, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    const DOC: &str = r#"<a href="https://x.test/a?lid=1">A</a><a href="https://x.test/b?lid=2">B</a>"#;

    fn session() -> Session {
        let mut session = Session::new(Settings::default());
        session.load(DOC);
        session.extract().unwrap();
        session
    }

    #[test]
    fn test_parse_link_number() {
        assert_eq!(parse_link_number("1"), Ok(0));
        assert_eq!(parse_link_number(" 3 "), Ok(2));
        assert!(parse_link_number("0").is_err());
        assert!(parse_link_number("two").is_err());
    }

    #[test]
    fn test_parse_numbered_keeps_equals_in_value() {
        assert_eq!(
            parse_numbered("2=https://x.test/?a=b"),
            Ok((1, "https://x.test/?a=b".to_string()))
        );
        assert!(parse_numbered("https://x.test").is_err());
    }

    #[test]
    fn test_cli_parses_rewrite() {
        let cli = Cli::try_parse_from([
            "linksmith",
            "rewrite",
            "mail.html",
            "--set-main",
            "1=https://x.test/new",
            "--toggle-deep",
            "2",
            "--by-position",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Rewrite { source, edits, output } => {
                assert_eq!(source.input.as_deref(), Some("mail.html"));
                assert_eq!(edits.set_main, vec![(0, "https://x.test/new".to_string())]);
                assert_eq!(edits.toggle_deep, vec![1]);
                assert!(edits.by_position);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_link_number() {
        assert!(Cli::try_parse_from(["linksmith", "rewrite", "--toggle-deep", "0"]).is_err());
    }

    #[test]
    fn test_apply_edits_and_params() {
        let mut session = session();
        let args = RewriteArgs {
            set_main: vec![(0, "https://x.test/new".to_string())],
            toggle_deep: vec![1],
            utm_campaign: Some("spring".to_string()),
            ..RewriteArgs::default()
        };
        args.apply_to(&mut session).unwrap();

        let updated = session.updated_content();
        assert!(updated.contains(r#"href="https://x.test/new?lid=1""#));
        assert!(updated.contains("https://x.test/b?lid=2&$deep_link=true"));
        assert!(updated.contains("utm_campaign=spring\""));
    }

    #[test]
    fn test_apply_removals_use_original_numbers() {
        let mut session = session();
        let args = RewriteArgs {
            remove: vec![0, 1, 0],
            ..RewriteArgs::default()
        };
        args.apply_to(&mut session).unwrap();
        assert!(session.links().is_empty());
    }

    #[test]
    fn test_apply_stops_on_invalid_url() {
        let mut session = session();
        let args = RewriteArgs {
            set_main: vec![(0, "nope".to_string())],
            ..RewriteArgs::default()
        };
        assert!(matches!(
            args.apply_to(&mut session),
            Err(LinkError::InvalidUrlEdit { .. })
        ));
        assert_eq!(session.updated_content(), DOC);
    }

    #[test]
    fn test_strategy_override() {
        let args = RewriteArgs {
            by_position: true,
            ..RewriteArgs::default()
        };
        assert_eq!(args.strategy(ReplaceStrategy::Substring), ReplaceStrategy::Position);
        assert_eq!(
            RewriteArgs::default().strategy(ReplaceStrategy::Position),
            ReplaceStrategy::Position
        );
    }
}

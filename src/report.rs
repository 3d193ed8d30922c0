// src/report.rs
// =============================================================================
// Human-readable rendering of links and parameters.
//
// Used by both the `extract` subcommand and the interactive session, so the
// two always print links the same way.
// =============================================================================

use std::fmt::Write;

use crate::links::{rules, DeepLinkParams, DiscoveredLink};

const URL_WIDTH: usize = 57;

/// Renders the link list as a table with a short summary underneath
pub fn format_links(links: &[DiscoveredLink]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{:<4} {:<60} {:<30} {:<6}", "#", "MAIN LINK", "TRACKING", "DEEP");
    let _ = writeln!(out, "{}", "=".repeat(103));

    for (i, link) in links.iter().enumerate() {
        let tracking = match link.tracking_param.as_deref() {
            Some(t) if rules::is_link_identifier(t) => format!("{} (locked)", t),
            Some(t) => t.to_string(),
            None => "-".to_string(),
        };
        let deep = if link.has_deep_link() { "on" } else { "off" };

        let _ = writeln!(
            out,
            "{:<4} {:<60} {:<30} {:<6}",
            i + 1,
            truncate(&link.main_link, URL_WIDTH),
            truncate(&tracking, 27),
            deep
        );
    }

    let with_deep = links.iter().filter(|l| l.has_deep_link()).count();
    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Summary:");
    let _ = writeln!(out, "   🔗 Links: {}", links.len());
    let _ = writeln!(out, "   📱 Deep linked: {}", with_deep);
    out
}

/// Renders one link with all of its parts, untruncated
pub fn format_link_detail(number: usize, link: &DiscoveredLink) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Link {}", number);
    let _ = writeln!(out, "  main:     {}", link.main_link);
    let _ = writeln!(
        out,
        "  tracking: {}",
        link.tracking_param.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  deep:     {}",
        if link.deep_link.is_empty() { "-" } else { link.deep_link.as_str() }
    );
    let _ = writeln!(out, "  full:     {}", link.reconstruct());
    out
}

pub fn format_params(params: &DeepLinkParams) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  deep_link:       {}", params.deep_link);
    let _ = writeln!(out, "  follow_redirect: {}", params.follow_redirect);
    let _ = writeln!(out, "  utm_source:      {}", params.utm_source);
    let _ = writeln!(out, "  utm_medium:      {}", params.utm_medium);
    let _ = writeln!(out, "  utm_campaign:    {}", params.utm_campaign);
    out
}

// Cuts on a char boundary so multi-byte URLs don't panic
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

// src/links/mod.rs
// =============================================================================
// This module contains the link engine.
//
// Submodules:
// - rules: Named regex rules (anchors, scheme, deep-link block, link id)
// - extract: Finds anchor hrefs and splits them into parts
// - params: The shared deep-link parameter set and the deep-link toggle
// - recompose: Writes edited links back into the document
// - error: The engine's error type
// - strategies: proptest href generators (tests only)
//
// The engine is pure text in, text out: no I/O, no shared state.
// =============================================================================

mod error;
mod extract;
mod params;
mod recompose;
pub mod rules;
#[cfg(test)]
mod strategies;

// Re-export the public API so callers can write `links::extract()`
pub use error::LinkError;
pub use extract::{extract, DiscoveredLink};
pub use params::{toggle_deep_link, DeepLinkParams, ParamUpdate};
pub use recompose::ReplaceStrategy;

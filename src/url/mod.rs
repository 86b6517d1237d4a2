//! URL handling module for Site-Gleaner
//!
//! This module provides seed parsing, link resolution and normalization,
//! same-site checks, and the link classifier that decides which links are
//! followed and at what priority.

mod classifier;
mod domain;
mod normalize;

// Re-export main functions
pub use classifier::{
    LinkClassifier, Rejection, DEFAULT_PRIORITY, HOMEPAGE_PRIORITY, KEYWORD_PRIORITY,
    NAV_PRIORITY,
};
pub use domain::{authority, extract_domain};
pub use normalize::{normalize_url, parse_seed, path_key, resolve_link, SeedUrl};

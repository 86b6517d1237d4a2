//! Configuration module for Site-Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turns a configuration plus a domain into an immutable
//! [`CrawlSession`].
//!
//! # Example
//!
//! ```no_run
//! use site_gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Crawler will keep at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod session;
mod types;
mod validation;

// Re-export types
pub use session::CrawlSession;
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, FilterConfig, RendererConfig, RendererKind,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

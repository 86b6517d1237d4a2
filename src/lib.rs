//! Site-Gleaner: a budgeted single-domain text harvester
//!
//! This crate crawls one web domain and extracts readable text from a bounded
//! set of relevant pages, under page-count, depth and wall-clock budgets.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod service;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Gleaner operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Renderer error: {0}")]
    Render(#[from] render::RenderError),

    #[error("No content captured while crawling {domain}")]
    NoContentCaptured { domain: String },

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Gleaner operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlSession};
pub use crawler::{run_crawl, CrawlReport, CrawlTermination};
pub use output::CrawlResult;
pub use service::{crawl_domain, ServiceError};
pub use state::WorkerState;

use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, FilterConfig, RendererConfig, UserAgentConfig,
};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filters)?;
    validate_extractor_config(&config.extractor)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_renderer_config(&config.renderer)?;
    Ok(())
}

/// Validates crawl budgets
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.visited_multiplier < 1 {
        return Err(ConfigError::Validation(format!(
            "visited_multiplier must be >= 1, got {}",
            config.visited_multiplier
        )));
    }

    if config.page_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "page_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.total_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "total_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.idle_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "idle_timeout_ms must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the filter patterns compile
fn validate_filter_config(config: &FilterConfig) -> ConfigResult<()> {
    for (name, pattern) in [
        ("noise_pattern", &config.noise_pattern),
        ("language_prefix_pattern", &config.language_prefix_pattern),
    ] {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", name, e)))?;
    }

    if config.ignore_prefixes.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "ignore_prefixes cannot contain an empty entry".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction rules
fn validate_extractor_config(config: &ExtractorConfig) -> ConfigResult<()> {
    if config.max_text_chars < 1 {
        return Err(ConfigError::Validation(
            "max_text_chars must be >= 1".to_string(),
        ));
    }

    for selector in config
        .chrome_selectors
        .iter()
        .chain(config.content_selectors.iter())
    {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidPattern(format!("CSS selector '{}': {:?}", selector, e))
        })?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_renderer_config(config: &RendererConfig) -> ConfigResult<()> {
    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "max_body_bytes must be > 0".to_string(),
        ));
    }
    Ok(())
}

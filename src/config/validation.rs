use crate::config::types::{AnnotationConfig, Config, CrawlerConfig, OutputConfig};
use crate::crawler::CompiledSelectors;
use crate::url::DomainAllowList;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    CompiledSelectors::compile(&config.selectors)?;
    validate_annotation_config(&config.annotation)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_domains must contain at least one domain".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_domain_pattern(domain)?;
    }

    let start = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    let allow_list = DomainAllowList::new(&config.allowed_domains);
    if !allow_list.permits(&start) {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' is not within allowed_domains",
            config.start_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates title overlay configuration
fn validate_annotation_config(config: &AnnotationConfig) -> Result<(), ConfigError> {
    if config.font_path.is_empty() {
        return Err(ConfigError::Validation(
            "font_path cannot be empty".to_string(),
        ));
    }

    if config.font_size.is_nan() || config.font_size <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "font_size must be > 0, got {}",
            config.font_size
        )));
    }

    if config.max_chars_per_line < 1 {
        return Err(ConfigError::Validation(format!(
            "max_chars_per_line must be >= 1, got {}",
            config.max_chars_per_line
        )));
    }

    if config.line_spacing < 0.0 {
        return Err(ConfigError::Validation(format!(
            "line_spacing must be >= 0, got {}",
            config.line_spacing
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("images_dir", &config.images_dir),
        ("json_path", &config.json_path),
        ("database_path", &config.database_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    validate_domain_string(pattern.strip_prefix("*.").unwrap_or(pattern))
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}

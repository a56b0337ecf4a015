use crate::config::types::{
    CatalogueConfig, Config, CoversConfig, FetcherConfig, SeasonsConfig, TranslateConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.seasons.is_none() && config.catalogue.is_none() && config.covers.is_none() {
        return Err(ConfigError::Validation(
            "at least one of [seasons], [catalogue] or [covers] must be configured".to_string(),
        ));
    }

    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;

    if let Some(seasons) = &config.seasons {
        validate_seasons_config(seasons)?;
    }
    if let Some(catalogue) = &config.catalogue {
        validate_catalogue_config(catalogue)?;
    }
    if let Some(covers) = &config.covers {
        validate_covers_config(covers)?;
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    validate_http_url("contact_url", &config.contact_url)?;
    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_seasons_config(config: &SeasonsConfig) -> Result<(), ConfigError> {
    validate_http_url("seasons.api_base", &config.api_base)?;
    validate_non_empty("seasons.current", &config.current)?;
    validate_non_empty("seasons.upcoming", &config.upcoming)?;
    validate_non_empty("seasons.output_path", &config.output_path)?;
    validate_max_pages("seasons.max_pages", config.max_pages)?;

    if let Some(translate) = &config.translate {
        validate_translate_config(translate)?;
    }

    Ok(())
}

fn validate_translate_config(config: &TranslateConfig) -> Result<(), ConfigError> {
    validate_http_url("seasons.translate.endpoint", &config.endpoint)?;
    validate_non_empty("seasons.translate.source", &config.source)?;
    validate_non_empty("seasons.translate.target", &config.target)?;

    if config.max_concurrent < 1 || config.max_concurrent > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 64, got {}",
            config.max_concurrent
        )));
    }

    Ok(())
}

fn validate_catalogue_config(config: &CatalogueConfig) -> Result<(), ConfigError> {
    validate_http_url("catalogue.base_url", &config.base_url)?;
    validate_non_empty("catalogue.page_param", &config.page_param)?;
    validate_non_empty("catalogue.output_path", &config.output_path)?;
    validate_non_empty("catalogue.marker", &config.marker)?;
    validate_max_pages("catalogue.max_pages", config.max_pages)?;

    for (name, selector) in [
        ("card_selector", &config.card_selector),
        ("title_selector", &config.title_selector),
        ("image_selector", &config.image_selector),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} '{}': {:?}", name, selector, e))
        })?;
    }

    if config.marker_depth < 1 || config.marker_depth > 16 {
        return Err(ConfigError::Validation(format!(
            "marker_depth must be between 1 and 16, got {}",
            config.marker_depth
        )));
    }

    Ok(())
}

fn validate_covers_config(config: &CoversConfig) -> Result<(), ConfigError> {
    validate_http_url("covers.api_base", &config.api_base)?;
    validate_non_empty("covers.input_path", &config.input_path)?;
    validate_non_empty("covers.output_path", &config.output_path)?;
    Ok(())
}

fn validate_max_pages(name: &str, max_pages: Option<u32>) -> Result<(), ConfigError> {
    if max_pages == Some(0) {
        return Err(ConfigError::Validation(format!("{} must be >= 1", name)));
    }
    Ok(())
}

fn validate_non_empty(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

/// Validates that a value parses as an absolute HTTP(S) URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

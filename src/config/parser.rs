use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so output files can be traced back to the config that
/// produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const USER_AGENT: &str = r#"
[user-agent]
crawler-name = "TestHarvester"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = format!(
            r#"
[fetcher]
politeness-delay-ms = 250
max-retries = 5
{USER_AGENT}
[seasons]
output-path = "seasons.json"

[catalogue]
base-url = "https://catalogue.example.com/catalogue"
max-pages = 40

[covers]
input-path = "in.json"
output-path = "out.json"
"#
        );

        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetcher.politeness_delay_ms, 250);
        assert_eq!(config.fetcher.max_retries, 5);
        assert_eq!(config.fetcher.rate_limit_cooldown_ms, 60_000);
        assert_eq!(config.user_agent.crawler_name, "TestHarvester");

        let seasons = config.seasons.unwrap();
        assert_eq!(seasons.current, "now");
        assert_eq!(seasons.upcoming, "upcoming");
        assert!(seasons.sfw);
        assert!(seasons.translate.is_none());

        let catalogue = config.catalogue.unwrap();
        assert_eq!(catalogue.max_pages, Some(40));
        assert_eq!(catalogue.marker, "Anime");
        assert_eq!(catalogue.marker_depth, 3);

        assert_eq!(config.covers.unwrap().default_count, 100);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_without_jobs_is_rejected() {
        let result = parse_config(USER_AGENT);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_translate_section() {
        let config_content = format!(
            r#"{USER_AGENT}
[seasons]
[seasons.translate]
endpoint = "https://translate.example.com/translate"
max-concurrent = 4
"#
        );
        let config = parse_config(&config_content).unwrap();
        let translate = config.seasons.unwrap().translate.unwrap();
        assert_eq!(translate.source, "en");
        assert_eq!(translate.target, "fr");
        assert_eq!(translate.max_concurrent, 4);
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}

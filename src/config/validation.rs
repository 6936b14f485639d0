use crate::config::types::{Config, FetchConfig, MirrorConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_mirror_config(&config.mirror)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates the mirror section: seed URL, depth bound, save root
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url must use http or https, got '{}'",
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "seed-url has no host".to_string(),
        ));
    }

    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    if config.save_root.is_empty() {
        return Err(ConfigError::Validation(
            "save-root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the fetch section: timeouts and download parallelism
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.page_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "page-timeout must be >= 1 second, got {}",
            config.page_timeout
        )));
    }

    if config.resource_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "resource-timeout must be >= 1 second, got {}",
            config.resource_timeout
        )));
    }

    if config.max_concurrent_downloads < 1 || config.max_concurrent_downloads > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-downloads must be between 1 and 64, got {}",
            config.max_concurrent_downloads
        )));
    }

    Ok(())
}

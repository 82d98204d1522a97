use super::{types::Config, ConfigError};

fn invalid(message: &str) -> Result<(), ConfigError> {
    Err(ConfigError::ValidationError(message.to_string()))
}

/// Validate configuration
///
/// Rejects values the search pipeline cannot run with: a zero port, zero
/// chunk/result/concurrency bounds, a year tolerance above one and empty
/// provider or public URLs.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return invalid("server.port cannot be 0");
    }
    if config.server.public_url.trim().is_empty() {
        return invalid("server.public_url cannot be empty");
    }
    if config.provider.base_url.trim().is_empty() {
        return invalid("provider.base_url cannot be empty");
    }
    if config.search.max_results == 0 {
        return invalid("search.max_results cannot be 0");
    }
    if config.search.max_concurrent_queries == 0 {
        return invalid("search.max_concurrent_queries cannot be 0");
    }
    if config.search.year_tolerance > 1 {
        return invalid("search.year_tolerance must be 0 or 1");
    }
    if config.enrichment.chunk_size == 0 {
        return invalid("enrichment.chunk_size cannot be 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &Config) {
        let result = validate_config(config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_bounds_fail() {
        let mut config = Config::default();
        config.enrichment.chunk_size = 0;
        assert_invalid(&config);

        let mut config = Config::default();
        config.search.max_results = 0;
        assert_invalid(&config);

        let mut config = Config::default();
        config.search.max_concurrent_queries = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_year_tolerance() {
        let mut config = Config::default();
        config.search.year_tolerance = 0;
        assert!(validate_config(&config).is_ok());
        config.search.year_tolerance = 2;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_empty_urls_fail() {
        let mut config = Config::default();
        config.provider.base_url = "  ".to_string();
        assert_invalid(&config);

        let mut config = Config::default();
        config.server.public_url = String::new();
        assert_invalid(&config);
    }
}

use anyhow::{bail, Result};
use std::time::Duration;

const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    // Strapi
    pub strapi_url: String,
    pub strapi_api_token: Option<String>,

    // HTTP
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let strapi_url = std::env::var("STRAPI_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STRAPI_URL.to_string());

        Self::new(
            &strapi_url,
            std::env::var("STRAPI_API_TOKEN").ok(),
            std::env::var("STRAPI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Build a config from explicit values, applying the same normalization
    /// as `from_env` (trailing slash trimmed, empty token treated as absent).
    pub fn new(strapi_url: &str, strapi_api_token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let strapi_url = strapi_url.trim().trim_end_matches('/').to_string();
        if !strapi_url.starts_with("http://") && !strapi_url.starts_with("https://") {
            bail!(
                "STRAPI_URL must start with http:// or https:// (got '{}')",
                strapi_url
            );
        }

        Ok(Self {
            strapi_url,
            strapi_api_token: strapi_api_token.filter(|t| !t.trim().is_empty()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("STRAPI_URL");
        std::env::remove_var("STRAPI_API_TOKEN");
        std::env::remove_var("STRAPI_TIMEOUT_SECS");
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().expect("defaults should load");
        assert_eq!(config.strapi_url, "http://localhost:1337");
        assert!(config.strapi_api_token.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_values() {
        clear_env();
        std::env::set_var("STRAPI_URL", "https://cms.example.com/");
        std::env::set_var("STRAPI_API_TOKEN", "secret-token");
        std::env::set_var("STRAPI_TIMEOUT_SECS", "5");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.strapi_url, "https://cms.example.com");
        assert_eq!(config.strapi_api_token.as_deref(), Some("secret-token"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout_falls_back() {
        clear_env();
        std::env::set_var("STRAPI_TIMEOUT_SECS", "soon");

        let config = Config::from_env().expect("should load");
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_empty_token_is_none() {
        clear_env();
        std::env::set_var("STRAPI_API_TOKEN", "");

        let config = Config::from_env().expect("should load");
        assert!(config.strapi_api_token.is_none());

        clear_env();
    }

    // ==================== new Tests ====================

    #[test]
    fn test_new_rejects_non_http_url() {
        let result = Config::new("localhost:1337", None, 30);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http://"));
    }

    #[test]
    fn test_new_trims_trailing_slashes() {
        let config = Config::new("http://localhost:1337//", None, 30).unwrap();
        assert_eq!(config.strapi_url, "http://localhost:1337");
    }
}

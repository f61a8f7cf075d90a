use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub bind_addr: String,
    pub concurrency_limit: usize,
    pub max_language_repos: usize,
    pub max_repo_pages: u32,
    pub image_timeout_ms: u64,
    pub rate_limit_per_minute: u32,
    /// Key the inbound rate limit on `X-Forwarded-For` instead of the peer.
    pub trust_forwarded_for: bool,
    pub card_art_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());

        let github_api_url = env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let concurrency_limit = parse_var("CONCURRENCY_LIMIT", 10)?;
        let max_language_repos = parse_var("MAX_LANGUAGE_REPOS", 20)?;
        let max_repo_pages = parse_var("MAX_REPO_PAGES", 10)?;
        let image_timeout_ms = parse_var("IMAGE_TIMEOUT_MS", 3000)?;
        let rate_limit_per_minute = parse_var("RATE_LIMIT_PER_MINUTE", 60)?;
        let trust_forwarded_for = parse_var("TRUST_FORWARDED_FOR", false)?;

        let card_art_base_url = env::var("CARD_ART_BASE_URL")
            .ok()
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        let config = Self {
            github_token,
            github_api_url,
            bind_addr,
            concurrency_limit,
            max_language_repos,
            max_repo_pages,
            image_timeout_ms,
            rate_limit_per_minute,
            trust_forwarded_for,
            card_art_base_url,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency_limit == 0 {
            return Err(Error::Config("CONCURRENCY_LIMIT must be at least 1".to_string()));
        }
        if self.max_repo_pages == 0 {
            return Err(Error::Config("MAX_REPO_PAGES must be at least 1".to_string()));
        }
        if self.rate_limit_per_minute == 0 {
            return Err(Error::Config("RATE_LIMIT_PER_MINUTE must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            concurrency_limit: 10,
            max_language_repos: 20,
            max_repo_pages: 10,
            image_timeout_ms: 3000,
            rate_limit_per_minute: 60,
            trust_forwarded_for: false,
            card_art_base_url: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    pub max_language_repos: usize,
    pub max_repo_pages: u32,
    pub image_timeout: Duration,
    pub card_art_base_url: Option<String>,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            max_language_repos: config.max_language_repos,
            max_repo_pages: config.max_repo_pages,
            image_timeout: Duration::from_millis(config.image_timeout_ms),
            card_art_base_url: config.card_art_base_url.clone(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_language_repos, 20);
        assert_eq!(config.max_repo_pages, 10);
        assert_eq!(config.image_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            concurrency_limit: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}

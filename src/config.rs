use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_STORE_BASE_PATH: &str = "database/user";
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_store_token() -> String {
    env::var("GITHUB_TOKEN").unwrap_or_default().trim().to_string()
}

pub fn get_store_repository() -> String {
    env::var("GITHUB_REPO").unwrap_or_default().trim().to_string()
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()))
}

pub fn get_store_base_path() -> String {
    sanitize_base_path(&env::var("STORE_BASE_PATH").unwrap_or_else(|_| DEFAULT_STORE_BASE_PATH.to_string()))
}

pub fn get_store_timeout() -> Duration {
    let secs = env::var("STORE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

pub fn get_bcrypt_cost() -> u32 {
    env::var("BCRYPT_COST")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|c| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(c))
        .unwrap_or(DEFAULT_BCRYPT_COST)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_GITHUB_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn sanitize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_STORE_BASE_PATH.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN is not configured")]
    MissingToken,

    #[error("GITHUB_REPO is not configured")]
    MissingRepository,

    #[error("GITHUB_REPO must look like owner/repo, got '{0}'")]
    InvalidRepository(String),
}

/// Everything the record store and the registration flow need, resolved once
/// at process start and handed to the components that use it.
#[derive(Clone)]
pub struct StoreConfig {
    pub store_token: String,
    /// Repository identifier in `owner/repo` form.
    pub store_repository: String,
    pub api_base_url: String,
    pub base_path: String,
    pub timeout: Duration,
    pub bcrypt_cost: u32,
}

impl StoreConfig {
    pub fn new(store_token: impl Into<String>, store_repository: impl Into<String>) -> Self {
        Self {
            store_token: store_token.into(),
            store_repository: store_repository.into(),
            api_base_url: DEFAULT_GITHUB_API_URL.to_string(),
            base_path: DEFAULT_STORE_BASE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    pub fn from_env() -> Self {
        Self {
            store_token: get_store_token(),
            store_repository: get_store_repository(),
            api_base_url: get_api_base_url(),
            base_path: get_store_base_path(),
            timeout: get_store_timeout(),
            bcrypt_cost: get_bcrypt_cost(),
        }
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = sanitize_base_url(url);
        self
    }

    pub fn with_base_path(mut self, path: &str) -> Self {
        self.base_path = sanitize_base_path(path);
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.store_repository.is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        match self.store_repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => Ok(()),
            _ => Err(ConfigError::InvalidRepository(self.store_repository.clone())),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_token", &"<redacted>")
            .field("store_repository", &self.store_repository)
            .field("api_base_url", &self.api_base_url)
            .field("base_path", &self.base_path)
            .field("timeout", &self.timeout)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("t", "octo/db");
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.base_path, "database/user");
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_repository_shape() {
        assert_eq!(StoreConfig::new("t", "octo/db").validate(), Ok(()));
        assert_eq!(StoreConfig::new("", "octo/db").validate(), Err(ConfigError::MissingToken));
        assert_eq!(StoreConfig::new("t", "").validate(), Err(ConfigError::MissingRepository));
        assert_eq!(
            StoreConfig::new("t", "octo").validate(),
            Err(ConfigError::InvalidRepository("octo".into()))
        );
        assert_eq!(
            StoreConfig::new("t", "octo/db/extra").validate(),
            Err(ConfigError::InvalidRepository("octo/db/extra".into()))
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", StoreConfig::new("ghp_supersecret", "octo/db"));
        assert!(!rendered.contains("ghp_supersecret"));
        assert!(rendered.contains("octo/db"));
    }

    #[test]
    fn test_cost_bounds_match_bcrypt() {
        assert!(bcrypt::hash("pw", MIN_BCRYPT_COST).is_ok());
        assert!(bcrypt::hash("pw", MIN_BCRYPT_COST - 1).is_err());
    }
}

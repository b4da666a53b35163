/// GitHub contents API client
use super::{ConcurrencyToken, ContentStore, ContentUpdate, StoreError, StoredContent};
use crate::config::StoreConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// GitHub API file response (only the fields we use)
#[derive(Debug, Deserialize)]
struct GitHubFile {
    content: String,
    sha: String,
}

/// GitHub API create/update request body
#[derive(Debug, Serialize)]
struct GitHubPut<'a> {
    message: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Reads and writes files in one repository through the contents API
pub struct GitHubContentStore {
    api_base_url: String,
    repository: String,
    client: reqwest::Client,
}

impl GitHubContentStore {
    /// Create a client authenticated with the configured token
    ///
    /// # Examples
    ///
    /// ```
    /// use rolereg::config::StoreConfig;
    /// use rolereg::store::GitHubContentStore;
    ///
    /// let store = GitHubContentStore::new(&StoreConfig::new("ghp_example", "octo/users-db")).unwrap();
    /// assert_eq!(
    ///     store.contents_url("database/user/owner.json"),
    ///     "https://api.github.com/repos/octo/users-db/contents/database/user/owner.json"
    /// );
    /// ```
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("rolereg/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let mut auth = HeaderValue::from_str(&format!("token {}", config.store_token))
            .map_err(|_| StoreError::Network("GITHUB_TOKEN contains invalid header characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base_url: config.api_base_url.clone(),
            repository: config.store_repository.clone(),
            client,
        })
    }

    /// Contents endpoint for a repository path, each segment percent-encoded
    pub fn contents_url(&self, path: &str) -> String {
        let encode_segments = |raw: &str| {
            raw.split('/')
                .map(|s| urlencoding::encode(s).into_owned())
                .collect::<Vec<_>>()
                .join("/")
        };
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base_url,
            encode_segments(&self.repository),
            encode_segments(path)
        )
    }

    /// Check rate limiting headers and return error if exceeded
    fn check_rate_limit(&self, response: &reqwest::Response) -> Result<(), StoreError> {
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        if let Some(remaining_count) = remaining {
            tracing::debug!("GitHub API rate limit remaining: {}", remaining_count);
            let status = response.status();
            if remaining_count == 0 && (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS) {
                let reset_time = response
                    .headers()
                    .get("x-ratelimit-reset")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<i64>().ok())
                    .and_then(|timestamp| chrono::DateTime::from_timestamp(timestamp, 0))
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(StoreError::RateLimitExceeded { reset_time });
            }
        }
        Ok(())
    }

    async fn error_body(response: reqwest::Response) -> String {
        response.text().await.unwrap_or_else(|_| "Unknown error".to_string())
    }
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    async fn get_content(&self, path: &str) -> Result<Option<StoredContent>, StoreError> {
        let url = self.contents_url(path);
        tracing::debug!(%url, "GET contents");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        self.check_rate_limit(&response)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%path, "No stored file yet");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: Self::error_body(response).await,
            });
        }

        let text = response.text().await.map_err(|e| StoreError::Network(e.to_string()))?;
        let file: GitHubFile = serde_json::from_str(&text)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

        Ok(Some(StoredContent {
            encoded: file.content,
            token: ConcurrencyToken::new(file.sha),
        }))
    }

    async fn put_content(&self, path: &str, update: ContentUpdate) -> Result<(), StoreError> {
        let url = self.contents_url(path);
        tracing::debug!(%url, creating = update.token.is_none(), "PUT contents");

        let body = GitHubPut {
            message: &update.message,
            content: &update.encoded,
            sha: update.token.as_ref().map(ConcurrencyToken::as_str),
        };

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        self.check_rate_limit(&response)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = Self::error_body(response).await;
        // 409 for a stale sha, 422 when a sha is missing for an existing file
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(StoreError::Conflict { status: status.as_u16(), body });
        }
        Err(StoreError::Status { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_url_encodes_segments() {
        let config = StoreConfig::new("t", "octo/db").with_api_base_url("http://127.0.0.1:9000/");
        let store = GitHubContentStore::new(&config).unwrap();
        assert_eq!(
            store.contents_url("data base/owner.json"),
            "http://127.0.0.1:9000/repos/octo/db/contents/data%20base/owner.json"
        );
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let config = StoreConfig::new("bad\ntoken", "octo/db");
        assert!(GitHubContentStore::new(&config).is_err());
    }
}

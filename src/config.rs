//! Connection settings for the document service.

use std::time::Duration;

use reqwest::Url;

use crate::error::{McpError, Result};

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Validated connection settings.
#[derive(Debug, Clone)]
pub struct PaperlessConfig {
    /// Instance root, always ending in `/`
    pub base_url: Url,
    /// API token
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl PaperlessConfig {
    /// Validate raw settings as they come from the CLI or environment.
    ///
    /// Accepts the instance root with or without a trailing `/api`.
    pub fn new(url: Option<&str>, token: Option<&str>, timeout_secs: u64) -> Result<Self> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| McpError::Config("PAPERLESS_URL is not set".to_string()))?;
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| McpError::Config("PAPERLESS_TOKEN is not set".to_string()))?;
        if timeout_secs == 0 {
            return Err(McpError::Config("timeout must be at least one second".to_string()));
        }

        let root = url.trim_end_matches('/');
        let root = root.strip_suffix("/api").unwrap_or(root);
        let base_url = Url::parse(&format!("{}/", root))
            .map_err(|e| McpError::Config(format!("invalid PAPERLESS_URL '{}': {}", url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(McpError::Config(format!(
                "PAPERLESS_URL must be http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            token: token.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// `<base>/api/`
    pub fn api_root(&self) -> Result<Url> {
        self.base_url
            .join("api/")
            .map_err(|e| McpError::Config(format!("invalid PAPERLESS_URL: {}", e)))
    }
}

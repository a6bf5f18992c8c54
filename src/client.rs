//! Paperless-NGX REST client.
//!
//! The dispatcher and cache only see the [`PaperlessApi`] trait; the
//! reqwest-backed [`PaperlessClient`] is the production implementation.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::config::PaperlessConfig;
use crate::error::{McpError, Result};
use crate::format::truncate;
use crate::model::{BulkEditRequest, Document, DocumentQuery, EntityKind, MetadataEntity, NewEntity, Page};

/// Page size used when walking a full metadata listing.
const LIST_PAGE_SIZE: u32 = 100;

/// Longest error body kept in [`McpError::Api`].
const MAX_ERROR_BODY: usize = 500;

/// Operations the tool layer needs from the document service.
#[async_trait]
pub trait PaperlessApi: Send + Sync {
    /// Every entity of a kind, across all pages.
    async fn list(&self, kind: EntityKind) -> Result<Vec<MetadataEntity>>;

    /// One page of documents matching the query.
    async fn search_documents(&self, query: &DocumentQuery) -> Result<Page<Document>>;

    /// Apply a bulk edit. Returns the server's response body.
    async fn bulk_edit(&self, request: &BulkEditRequest) -> Result<JsonValue>;

    /// Create a tag, correspondent or document type.
    async fn create(&self, kind: EntityKind, entity: &NewEntity) -> Result<MetadataEntity>;

    /// Cheap authenticated request used as a startup reachability check.
    async fn ping(&self) -> Result<()>;
}

/// HTTP client for a single Paperless-NGX instance.
pub struct PaperlessClient {
    http: Client,
    api_root: Url,
}

impl PaperlessClient {
    /// Build a client with the token attached to every request.
    pub fn new(config: &PaperlessConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&format!("Token {}", config.token))
            .map_err(|_| McpError::Config("token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("paperless-mcp/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_root: config.api_root()?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_root
            .join(path)
            .map_err(|e| McpError::Internal(format!("bad endpoint '{}': {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, url: Url, body: &JsonValue) -> Result<T> {
        trace!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl PaperlessApi for PaperlessClient {
    async fn list(&self, kind: EntityKind) -> Result<Vec<MetadataEntity>> {
        let mut url = self.endpoint(&format!("{}/", kind.path()))?;
        url.query_pairs_mut()
            .append_pair("page_size", &LIST_PAGE_SIZE.to_string());

        let mut entities = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(url);
        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(McpError::Decode(format!(
                    "{} listing links back to an earlier page: {}",
                    kind, url
                )));
            }
            let page: Page<MetadataEntity> = self.get_json(url).await?;
            entities.extend(page.results);
            next = page
                .next
                .map(|link| {
                    Url::parse(&link)
                        .map_err(|e| McpError::Decode(format!("bad next link '{}': {}", link, e)))
                })
                .transpose()?;
        }

        debug!(%kind, count = entities.len(), "listed");
        Ok(entities)
    }

    async fn search_documents(&self, query: &DocumentQuery) -> Result<Page<Document>> {
        let mut url = self.endpoint("documents/")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_params() {
                pairs.append_pair(key, &value);
            }
        }
        self.get_json(url).await
    }

    async fn bulk_edit(&self, request: &BulkEditRequest) -> Result<JsonValue> {
        let url = self.endpoint("documents/bulk_edit/")?;
        self.post_json(url, &request.to_body()).await
    }

    async fn create(&self, kind: EntityKind, entity: &NewEntity) -> Result<MetadataEntity> {
        let url = self.endpoint(&format!("{}/", kind.path()))?;
        let body = serde_json::to_value(entity)?;
        self.post_json(url, &body).await
    }

    async fn ping(&self) -> Result<()> {
        let mut url = self.endpoint("tags/")?;
        url.query_pairs_mut().append_pair("page_size", "1");
        let _: Page<MetadataEntity> = self.get_json(url).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(McpError::Api {
            status: status.as_u16(),
            body: truncate(&body, MAX_ERROR_BODY),
        });
    }
    serde_json::from_str(&body).map_err(|e| McpError::Decode(e.to_string()))
}

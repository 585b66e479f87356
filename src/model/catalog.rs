//! Catalog service client: the remote page-fetch seam and its HTTP implementation
//!
//! Everything above this layer talks to the catalog through [`CatalogSource`];
//! the HTTP client is one implementation, tests substitute scripted mocks.
//! A fetch is pure: no caching here, one request in, one page out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CatalogError;
use crate::model::types::{Page, PageRequest};

/// One page of catalog items per request; stateless besides the request it
/// was given
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, CatalogError>;
}

/// Connection settings for the hosted catalog service
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub locale: String,
    pub page_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://catalog.tunedeck.app/v1".to_string(),
            locale: "en".to_string(),
            page_timeout: Duration::from_secs(10),
        }
    }
}

/// JSON body of a page request; exactly one of the selectors is set
#[derive(Serialize)]
struct PageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    browse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radio_seed: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation: Option<&'a str>,
    locale: &'a str,
}

impl<'a> PageBody<'a> {
    fn for_request(request: &'a PageRequest, locale: &'a str) -> Self {
        let mut body = Self {
            browse_id: None,
            query: None,
            radio_seed: None,
            continuation: None,
            locale,
        };
        match request {
            PageRequest::Browse(endpoint) => {
                body.browse_id = endpoint.browse_id();
                if let crate::model::BrowseEndpoint::Search(q) = endpoint {
                    body.query = Some(q.as_str());
                }
            }
            PageRequest::Playback(endpoint) => {
                body.radio_seed = Some(endpoint.seed_id.as_str());
            }
            PageRequest::Continuation(token) => {
                body.continuation = Some(token.0.as_str());
            }
        }
        body
    }
}

/// Catalog client over the service's JSON page endpoint
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpCatalogClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.page_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Build against an already-configured `reqwest` client (connection pools
    /// are shared with the embedding application)
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    fn page_url(&self) -> String {
        format!("{}/page", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, CatalogError> {
        let body = PageBody::for_request(request, &self.config.locale);
        tracing::debug!(request = ?request, "fetching catalog page");

        let response = self
            .http
            .post(self.page_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let page: Page = response
                .json()
                .await
                .map_err(|e| CatalogError::Decode(e.to_string()))?;
            tracing::debug!(
                items = page.items.len(),
                has_continuation = !page.is_final(),
                "catalog page received"
            );
            return Ok(page);
        }

        // A client error on a continuation request means the token is dead;
        // anything else is the service having a bad moment.
        if status.is_client_error() && matches!(request, PageRequest::Continuation(_)) {
            tracing::warn!(status = %status, "continuation rejected by catalog service");
            return Err(CatalogError::InvalidContinuation);
        }
        tracing::warn!(status = %status, "catalog page request failed");
        Err(CatalogError::Network(format!("status {}", status)))
    }
}

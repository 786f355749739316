//! HTTP adapter for the upstream program catalog.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use tracing::debug;
use url::Url;
use ysws_notifier_core::programs::{parse_catalog, CatalogSource, ProgramRecord};
use ysws_notifier_core::{Error, Result};

/// The upstream only answers requests that look like they come from its own site.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:135.0) Gecko/20100101 Firefox/135.0";
const UPSTREAM_ORIGIN: &str = "https://ysws.hackclub.com";
const UPSTREAM_REFERER: &str = "https://ysws.hackclub.com/";

pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpCatalogSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(Self::headers())
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ORIGIN, HeaderValue::from_static(UPSTREAM_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(UPSTREAM_REFERER));
        headers
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        debug!("[Catalog] GET {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| Error::Catalog(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Catalog(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Catalog(format!(
                "Upstream returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let document: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| Error::Catalog(format!("Failed to parse response: {}", e)))?;
        parse_catalog(document)
    }
}

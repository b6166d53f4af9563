//! HTTP fetcher built on `reqwest`.

use std::time::Instant;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, instrument, warn};
use url::Url;

use super::Fetcher;
use crate::config::Config;
use crate::error::FetchError;
use crate::metrics;

/// Fetches resources over HTTP(S) with a browser User-Agent, bounded time
/// and bounded body size.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Pooled HTTP client, shared across requests.
    http: reqwest::Client,
    /// Maximum accepted body size in bytes.
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/csv,text/plain;q=0.9,*/*;q=0.8"),
        );

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            // Covers connect, redirects and reading the body
            .timeout(config.fetch_timeout())
            .connect_timeout(config.connect_timeout())
            .tcp_nodelay(true)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            max_body_bytes: config.max_body_bytes,
        })
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let start = Instant::now();
        let result = self.get_inner(url).await;
        metrics::record_fetch_latency(start);

        match &result {
            Ok(body) => debug!(bytes = body.len(), "Fetched resource"),
            Err(e) => warn!(error = %e, "Fetch failed"),
        }

        result
    }

    async fn get_inner(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let url_str = url.as_str();

        let mut response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url_str, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::BodyTooLarge {
            url: url_str.to_string(),
            limit: self.max_body_bytes,
        };

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(url_str, &e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        Box::pin(self.get(url))
    }
}

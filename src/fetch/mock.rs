//! In-memory fetcher for unit testing.
//!
//! Serves canned responses keyed by URL without making network requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use url::Url;

use super::Fetcher;
use crate::error::FetchError;

/// Canned outcome for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Non-success status.
    Status(u16),
    /// Request times out.
    Timeout,
    /// Host cannot be reached.
    Unreachable,
}

/// Mock fetcher for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Responses by URL string.
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// URLs requested, in order.
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Create a mock fetcher with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for a URL.
    pub fn with_response(self, url: &str, response: MockResponse) -> Self {
        self.set_response(url, response);
        self
    }

    /// Register a 200 text body for a URL.
    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_response(url, MockResponse::Body(body.as_bytes().to_vec()))
    }

    /// Replace the response for a URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(normalize(url), response);
    }

    /// URLs fetched so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn respond(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let key = url.as_str().to_string();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.clone());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
            .unwrap_or(MockResponse::Status(404));

        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status) => Err(FetchError::Status { url: key, status }),
            MockResponse::Timeout => Err(FetchError::Timeout { url: key }),
            MockResponse::Unreachable => Err(FetchError::Connect {
                url: key,
                reason: "dns error: failed to lookup address information".to_string(),
            }),
        }
    }
}

/// Registered keys go through the same normalization as request URLs.
fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl Fetcher for MockFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        Box::pin(async move { self.respond(url) })
    }
}

//! Remote resource retrieval.
//!
//! This module handles:
//! - The [`Fetcher`] seam used by the preview pipeline
//! - The `reqwest`-backed HTTP fetcher
//! - An in-memory fetcher for tests

pub mod client;
pub mod mock;

use futures::future::BoxFuture;
use url::Url;

use crate::error::FetchError;

pub use client::HttpFetcher;
pub use mock::{MockFetcher, MockResponse};

/// Retrieves the raw bytes of a remote resource.
///
/// One call issues at most one outbound request; implementations never retry.
pub trait Fetcher: Send + Sync {
    /// Fetch the full body at `url`.
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

//! The tabular preview service.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{PreviewError, ValidationError};
use crate::fetch::Fetcher;
use crate::metrics;
use crate::table::{parse_csv, Preview};

/// Conventional "head" size.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Turns a URL into a bounded, column-structured preview.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct PreviewService {
    fetcher: Arc<dyn Fetcher>,
    limit: usize,
}

impl std::fmt::Debug for PreviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewService")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl PreviewService {
    /// Create a service returning at most `limit` rows.
    pub fn new(fetcher: Arc<dyn Fetcher>, limit: usize) -> Self {
        Self { fetcher, limit }
    }

    /// Maximum rows per preview.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch `url`, parse it as CSV and return the first rows.
    ///
    /// Issues exactly one outbound request. Never retries.
    #[instrument(skip(self))]
    pub async fn preview(&self, url: &str) -> Result<Preview, PreviewError> {
        let result = self.run(url).await;

        match &result {
            Ok(preview) => {
                info!(
                    rows = preview.len(),
                    total_rows = preview.total_rows(),
                    columns = preview.columns().len(),
                    "Preview ready"
                );
                metrics::record_preview_served(preview.len());
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Preview failed");
                metrics::inc_preview_failures(e.kind());
            }
        }

        result
    }

    async fn run(&self, url: &str) -> Result<Preview, PreviewError> {
        let url = validate_url(url)?;
        let body = self.fetcher.fetch(&url).await?;
        let doc = parse_csv(&body)?;
        Ok(doc.head(self.limit))
    }
}

/// Check that `raw` is a non-empty, absolute http(s) URL.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField("file_url"));
    }

    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme(other.to_string())),
    }
}

//! Unified error types for the preview service.

use strum::IntoStaticStr;
use thiserror::Error;

/// Top-level error type for the service binary and library entry points.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration was loaded but is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while retrieving a remote resource.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("timed out fetching {url}")]
    Timeout {
        /// URL being fetched.
        url: String,
    },

    /// Could not connect to the remote host (DNS, refused, TLS).
    #[error("could not connect to {url}: {reason}")]
    Connect {
        /// URL being fetched.
        url: String,
        /// Underlying cause.
        reason: String,
    },

    /// The remote answered with a non-success status.
    #[error("{url} responded with HTTP {status}")]
    Status {
        /// URL being fetched.
        url: String,
        /// Status code returned by the origin.
        status: u16,
    },

    /// The body exceeded the configured size bound.
    #[error("{url} body exceeds {limit} bytes")]
    BodyTooLarge {
        /// URL being fetched.
        url: String,
        /// Configured byte limit.
        limit: usize,
    },

    /// Any other transport failure.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// URL being fetched.
        url: String,
        /// Underlying cause.
        reason: String,
    },
}

impl FetchError {
    /// Classify a `reqwest` error for the given URL.
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if err.is_connect() {
            FetchError::Connect {
                url,
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            FetchError::Request {
                url,
                reason: err.to_string(),
            }
        }
    }
}

/// Errors raised while decoding fetched bytes as tabular text.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not valid UTF-8.
    #[error("content is not valid UTF-8 text (invalid byte at offset {offset})")]
    NotText {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// The CSV reader failed on a record.
    #[error("malformed CSV at record {record}: {reason}")]
    Malformed {
        /// One-based record number (header is record 1).
        record: u64,
        /// Reader error message.
        reason: String,
    },
}

/// Errors raised while validating inbound request data.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The URL could not be parsed.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The URL scheme is not fetchable.
    #[error("unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),
}

/// Failure of a single preview request.
#[derive(Error, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum PreviewError {
    /// The remote resource could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The retrieved content could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The request itself was invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PreviewError {
    /// Short machine-readable kind, used in error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

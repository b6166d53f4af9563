//! Remote CSV preview service.
//!
//! Fetches a CSV document from a caller-supplied URL, parses it, and returns
//! the first rows as a JSON array of objects keyed by header name.
//!
//! ```text
//! POST /api/upload_file  file_url=https://example.com/data.csv
//!
//! [{"name":"Ada","age":36},{"name":"Bob","age":null}]
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`table`]: Tabular document model, cell inference and CSV parsing
//! - [`fetch`]: Outbound HTTP retrieval
//! - [`preview`]: The fetch-parse-truncate pipeline
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod preview;
pub mod table;
pub mod utils;

pub use config::Config;
pub use error::{PreviewError, Result, ServiceError};
pub use preview::PreviewService;

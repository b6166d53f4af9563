//! Tabular preview pipeline: fetch, parse, truncate.

pub mod service;

pub use service::{validate_url, PreviewService, DEFAULT_PREVIEW_ROWS};

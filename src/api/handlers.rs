//! HTTP API handlers.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Form, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use std::sync::Arc;

use super::error::ApiError;
use crate::config::Config;
use crate::error::{PreviewError, ServiceError, ValidationError};
use crate::fetch::HttpFetcher;
use crate::preview::PreviewService;
use crate::table::Preview;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Preview pipeline.
    pub preview: PreviewService,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(preview: PreviewService) -> Self {
        Self {
            preview,
            metrics: None,
        }
    }

    /// Validate config and build state backed by the HTTP fetcher.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        config.validate().map_err(ServiceError::InvalidConfig)?;
        let fetcher = HttpFetcher::new(config)?;
        let preview = PreviewService::new(Arc::new(fetcher), config.preview_rows);
        Ok(Self::new(preview))
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("preview", &self.preview)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Static greeting.
#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    /// Greeting text.
    pub message: &'static str,
    /// Fixed marker value.
    pub test: &'static str,
}

/// Form body of `POST /api/upload_file`.
#[derive(Debug, Deserialize)]
pub struct UploadForm {
    /// URL of the CSV to preview.
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// `GET /api/python`
pub async fn hello() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello, World!",
        test: "hello",
    })
}

/// `GET /api/python/{name}` - name is echoed verbatim.
pub async fn greet(Path(name): Path<String>) -> String {
    format!("Hello {name}")
}

/// `POST /api/upload_file` - preview the CSV at `file_url`.
pub async fn upload_file(
    State(state): State<AppState>,
    form: Result<Form<UploadForm>, FormRejection>,
) -> Result<Json<Preview>, ApiError> {
    let Form(form) = form?;
    let url = form
        .file_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| PreviewError::from(ValidationError::MissingField("file_url")))?;

    debug!(url = %url, "Preview requested");

    let preview = state.preview.preview(&url).await?;
    Ok(Json(preview))
}

/// Prometheus exposition handler - 503 when no recorder is installed.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

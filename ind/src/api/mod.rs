//! HTTP boundary
//!
//! Thin axum layer over `IngestionService`: parse the request, delegate,
//! serialize the result. Malformed JSON and unknown priority literals are
//! rejected by the extractors; range and emptiness checks live in the
//! service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::domain::{BatchStatus, IngestionRecord, IngestionStatus, Priority};
use crate::error::IngestError;
use crate::service::IngestionService;

/// Build the application router.
pub fn build_router(service: Arc<IngestionService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ingest", post(ingest))
        .route("/status/{ingestion_id}", get(status))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub ids: Vec<u64>,
    pub priority: Priority,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ingestion_id: String,
}

#[derive(Debug, Serialize)]
pub struct BatchView {
    pub batch_id: String,
    pub ids: Vec<u64>,
    pub status: BatchStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ingestion_id: String,
    pub status: IngestionStatus,
    pub batches: Vec<BatchView>,
}

impl From<IngestionRecord> for StatusResponse {
    fn from(record: IngestionRecord) -> Self {
        Self {
            ingestion_id: record.id.to_string(),
            status: record.status(),
            batches: record
                .batches
                .into_iter()
                .map(|b| BatchView {
                    batch_id: b.id.to_string(),
                    ids: b.ids,
                    status: b.status,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

fn error_response(err: IngestError) -> (StatusCode, Json<ErrorBody>) {
    match err {
        IngestError::InvalidInput(detail) => (StatusCode::BAD_REQUEST, Json(ErrorBody { detail })),
        IngestError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                detail: "Ingestion ID not found".to_string(),
            }),
        ),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ingest(
    State(service): State<Arc<IngestionService>>,
    Json(req): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), (StatusCode, Json<ErrorBody>)> {
    debug!(count = req.ids.len(), priority = %req.priority, "ingest: request received");
    let ingestion_id = service
        .submit(req.ids, req.priority)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            ingestion_id: ingestion_id.to_string(),
        }),
    ))
}

async fn status(
    State(service): State<Arc<IngestionService>>,
    Path(ingestion_id): Path<String>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorBody>)> {
    debug!(%ingestion_id, "status: request received");
    let record = service
        .status(&ingestion_id)
        .await
        .map_err(error_response)?;
    Ok(Json(StatusResponse::from(record)))
}

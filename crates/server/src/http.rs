//! HTTP surface for a loaded model.
//!
//! ## Routes
//! - `GET /health` → `{"status": "ok"}`
//! - `GET /recommend?user_id=<key>&k=5` → `{"userId", "recommendations": [{"videoId", "score"}]}`
//! - `GET /similar?video_id=<key>&k=5` → `{"videoId", "similar": [{"videoId", "score"}]}`
//!
//! Lookup misses and empty results are 404 with a `{"detail": <message>}`
//! body. Scoring runs on the blocking pool so request tasks never stall
//! the runtime.

use crate::error::ServiceError;
use crate::service::{Recommendation, RecommendationService};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

const DEFAULT_K: usize = 5;

fn default_k() -> usize {
    DEFAULT_K
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub user_id: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub video_id: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub similar: Vec<Recommendation>,
}

/// Errors as seen by HTTP clients
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UnknownUser(_) | ServiceError::UnknownItem(_) => {
                ApiError::NotFound(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Routes over a shared, immutable service
pub fn router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommend", get(recommend))
        .route("/similar", get(similar))
        .with_state(service)
}

/// Bind `addr` and serve until the process exits
pub async fn serve(service: Arc<RecommendationService>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(service))
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn recommend(
    State(service): State<Arc<RecommendationService>>,
    Query(params): Query<RecommendQuery>,
) -> std::result::Result<Json<RecommendResponse>, ApiError> {
    let start = Instant::now();
    let user_key = params.user_id.clone();
    let k = params.k;

    let recommendations = tokio::task::spawn_blocking(move || service.recommend(&user_key, k))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))??;

    if recommendations.is_empty() {
        return Err(ApiError::NotFound(
            "No recommendations available for user".to_string(),
        ));
    }

    info!(
        "Recommended {} videos for {} in {:.2?}",
        recommendations.len(),
        params.user_id,
        start.elapsed()
    );
    Ok(Json(RecommendResponse {
        user_id: params.user_id,
        recommendations,
    }))
}

async fn similar(
    State(service): State<Arc<RecommendationService>>,
    Query(params): Query<SimilarQuery>,
) -> std::result::Result<Json<SimilarResponse>, ApiError> {
    let video_key = params.video_id.clone();
    let k = params.k;

    let similar = tokio::task::spawn_blocking(move || service.similar_items(&video_key, k))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(SimilarResponse {
        video_id: params.video_id,
        similar,
    }))
}

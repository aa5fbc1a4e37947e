mod clients;
mod projects;

use axum::Json;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

pub use clients::*;
pub use projects::*;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Service banner
#[utoipa::path(get, path = "/", tag = "system", responses((status = 200, body = String)))]
#[instrument]
pub async fn root() -> &'static str {
    "mend storage API"
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

//! HTTP-facing error types.

use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use miette::Diagnostic;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::db::StorageError;

/// Server lifecycle errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}")]
    #[diagnostic(
        code(mend::api::bind),
        help("Is another process listening on this address? Try a different --port")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(mend::api::serve))]
    Serve(#[from] std::io::Error),
}

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "client 7 not found")]
    pub error: String,
}

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// `NotFound` becomes 404, every other storage error 500.
pub(crate) fn storage_error(entity: &str, e: StorageError) -> HandlerError {
    if e.is_not_found() {
        return error_response(StatusCode::NOT_FOUND, format!("{entity} not found"));
    }
    error!(error = %e, "storage error");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("server error: {e}"))
}

/// Decode an optional JSON entity. An empty body or `null` yields `None`,
/// which the adapter rejects as a nil entity.
pub(crate) fn parse_entity<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}")))
}

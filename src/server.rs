//! HTTP surface: `POST /upload-pdf` and `GET /health`.
//!
//! The upload handler never fails at the HTTP level once it has a file:
//! every pipeline error comes back as `200 OK` with an error envelope. Only
//! a request that carries no usable `file` field gets a non-2xx status
//! (`422`, or `413` when the body exceeds the upload limit), still with an
//! error envelope as the body.

use crate::error::RelayError;
use crate::model::Envelope;
use crate::relay::Relay;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Multipart field carrying the statement.
pub const FILE_FIELD: &str = "file";

/// Build the application router around a relay.
pub fn router(relay: Relay) -> Router {
    let body_limit = relay.config().max_upload_bytes;

    Router::new()
        .route("/upload-pdf", post(upload_pdf))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Create the upload directory, bind, and serve until the process stops.
pub async fn serve(relay: Relay) -> Result<(), RelayError> {
    let config = relay.config().clone();

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| RelayError::StoreFailed {
            path: config.upload_dir.clone(),
            source: e,
        })?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| RelayError::Internal(format!("Failed to bind {}: {e}", config.bind_addr)))?;
    let local = listener
        .local_addr()
        .map_err(|e| RelayError::Internal(e.to_string()))?;

    info!("Listening on http://{}", local);
    info!("Uploads stored under {}", config.upload_dir.display());

    axum::serve(listener, router(relay))
        .await
        .map_err(|e| RelayError::Internal(format!("Server error: {e}")))
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /upload-pdf
async fn upload_pdf(
    State(relay): State<Relay>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<Envelope>) {
    let limit = relay.config().max_upload_bytes;
    let (filename, bytes) = match read_file_field(multipart, limit).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Rejected upload: {}", e);
            let status = match e {
                RelayError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            return (status, Json(Envelope::error(e.to_string())));
        }
    };

    info!("Received request to upload: {}", filename);
    let envelope = relay.upload_envelope(&filename, &bytes).await;
    (StatusCode::OK, Json(envelope))
}

/// Pull the filename and bytes of the `file` field out of the form.
///
/// Other fields are skipped.
async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
    limit: usize,
) -> Result<(String, Vec<u8>), RelayError> {
    let mut multipart = multipart.map_err(|e| RelayError::InvalidUpload(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, limit))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(RelayError::MissingField {
        field: FILE_FIELD.to_string(),
    })
}

/// A body cut off by `DefaultBodyLimit` surfaces as a multipart read error.
fn upload_error(err: MultipartError, limit: usize) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::UploadTooLarge { limit }
    } else {
        RelayError::InvalidUpload(err.body_text())
    }
}

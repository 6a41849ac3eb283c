//! Error type for the statement-relay library.
//!
//! Every failure inside a relay is a [`RelayError`]. The variants keep the
//! cause visible in logs, but the HTTP boundary does not expose them: the
//! upload handler flattens any variant into the uniform error envelope
//! (`{"status":"error","message": ...}`) using its `Display` text.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the statement-relay library.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The multipart body did not carry the expected file field.
    #[error("Missing multipart field '{field}'")]
    MissingField { field: String },

    /// The multipart body could not be read.
    #[error("Invalid multipart upload: {0}")]
    InvalidUpload(String),

    /// The request body exceeded the configured upload limit.
    #[error("Upload exceeds the {limit}-byte limit")]
    UploadTooLarge { limit: usize },

    /// The client-supplied filename would resolve outside the upload directory.
    #[error("Refusing to store upload under unsafe filename '{filename}'")]
    UnsafeFilename { filename: String },

    /// Writing the uploaded bytes to disk failed.
    #[error("Failed to store upload at '{path}': {source}")]
    StoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The PDF could not be parsed into text.
    #[error("Failed to extract text from '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No API key was configured for the completions endpoint.
    #[error("Completions API key is not configured.\nSet OPENROUTER_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("Completions request failed: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("Completions request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The endpoint answered with a non-success status.
    #[error("Completions API returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The endpoint answered 2xx but the body was not a completion.
    #[error("Malformed completions response: {0}")]
    MalformedResponse(String),

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The model's reply was not valid JSON.
    #[error("Model reply is not valid JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map a `reqwest` failure onto the transport or timeout variant.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            RelayError::Timeout { secs: timeout_secs }
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

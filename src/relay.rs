//! The relay: save → extract → complete → decode, once per statement.
//!
//! [`Relay`] owns the configuration and the completion provider and is
//! shared read-only between requests. It has no other state.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::model::Envelope;
use crate::pipeline::llm::{CompletionProvider, OpenRouterClient};
use crate::pipeline::{decode, extract, llm, store};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Characters of the model reply echoed to the log.
const REPLY_PREVIEW_CHARS: usize = 100;

/// Runs statements through the pipeline.
#[derive(Clone)]
pub struct Relay {
    config: Arc<RelayConfig>,
    provider: Arc<dyn CompletionProvider>,
}

impl Relay {
    /// Create a relay with an explicit provider.
    pub fn new(config: RelayConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Create a relay talking to the configured completions endpoint.
    pub fn from_config(config: RelayConfig) -> Result<Self, RelayError> {
        let client = OpenRouterClient::from_config(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Store an uploaded statement, then relay it.
    pub async fn relay_upload(&self, filename: &str, bytes: &[u8]) -> Result<Value, RelayError> {
        let path = store::store_upload(&self.config.upload_dir, filename, bytes).await?;
        self.relay_file(&path).await
    }

    /// Relay a statement that is already on disk.
    pub async fn relay_file(&self, path: &Path) -> Result<Value, RelayError> {
        let text = extract::extract_text(path).await?;

        info!("Starting AI analysis...");
        let reply = llm::parse_statement(&self.provider, &text, &self.config).await?;
        info!(
            "AI response received: {}...",
            decode::preview(&reply, REPLY_PREVIEW_CHARS)
        );

        let transactions = decode::decode_reply(&reply)?;
        match decode::transaction_count(&transactions) {
            Some(n) => info!("Parsed {} transactions", n),
            None => warn!("Model reply is JSON but not an array; relaying as-is"),
        }
        Ok(transactions)
    }

    /// [`Relay::relay_upload`], with any failure folded into an error envelope.
    pub async fn upload_envelope(&self, filename: &str, bytes: &[u8]) -> Envelope {
        into_envelope(self.relay_upload(filename, bytes).await)
    }

    /// [`Relay::relay_file`], with any failure folded into an error envelope.
    pub async fn file_envelope(&self, path: &Path) -> Envelope {
        into_envelope(self.relay_file(path).await)
    }
}

fn into_envelope(result: Result<Value, RelayError>) -> Envelope {
    match result {
        Ok(transactions) => Envelope::success(transactions),
        Err(e) => {
            warn!("Relay failed: {}", e);
            Envelope::error(e.to_string())
        }
    }
}

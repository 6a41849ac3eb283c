//! # statement-relay
//!
//! Upload a PDF bank statement, extract its text, and let a hosted LLM turn
//! it into transaction JSON.
//!
//! The service has no parsing logic of its own. Each request runs one
//! sequential chain and the model's JSON is relayed back untouched:
//!
//! ```text
//! POST /upload-pdf
//!  │
//!  ├─ 1. Store    write the upload under the upload directory
//!  ├─ 2. Extract  PDF → plain text via pdf-extract (spawn_blocking)
//!  ├─ 3. LLM      system + user prompt → chat-completions endpoint
//!  ├─ 4. Decode   reply → JSON, no repair
//!  └─ 5. Reply    {"status":"success","transactions":[...]}
//!                 {"status":"error","message":"..."}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statement_relay::{serve, Relay, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::builder()
//!         .maybe_api_key(std::env::var("OPENROUTER_API_KEY").ok())
//!         .build()?;
//!     serve(Relay::from_config(config)?).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `statement-relay` binary (clap + anyhow + dotenvy + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod relay;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    RelayConfig, RelayConfigBuilder, API_KEY_ENV, DEFAULT_API_URL, DEFAULT_APP_TITLE, DEFAULT_MODEL,
};
pub use error::RelayError;
pub use model::{Envelope, Transaction, TransactionKind, TransactionSummary};
pub use pipeline::llm::{CompletionProvider, OpenRouterClient};
pub use relay::Relay;
pub use server::{router, serve};

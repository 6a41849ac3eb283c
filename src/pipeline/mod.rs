//! Pipeline stages for relaying a bank statement to the model.
//!
//! Each submodule implements exactly one step. They run once per request,
//! in strict sequence, driven by [`crate::relay::Relay`].
//!
//! ## Data Flow
//!
//! ```text
//! store ──▶ extract ──▶ llm ──▶ decode
//! (disk)   (pdf-extract) (HTTP)  (serde_json)
//! ```
//!
//! 1. [`store`]   — write the uploaded bytes under the upload directory
//! 2. [`extract`] — pull plain text out of the PDF; runs in `spawn_blocking`
//!    because the parser is synchronous and CPU-bound
//! 3. [`llm`]     — send the prompt pair to the completions endpoint; the only
//!    stage with network I/O
//! 4. [`decode`]  — parse the reply as JSON, with no repair step

pub mod decode;
pub mod extract;
pub mod llm;
pub mod store;

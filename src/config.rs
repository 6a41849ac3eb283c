//! Configuration for the relay service.
//!
//! Everything the service needs at runtime lives in [`RelayConfig`], built
//! via [`RelayConfig::builder()`]. The binary maps CLI flags and environment
//! variables onto the builder; tests build it directly.

use crate::error::RelayError;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default hosted chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model routed by the completions endpoint.
pub const DEFAULT_MODEL: &str = "openrouter/free";

/// Default `X-Title` attribution header, naming this service.
pub const DEFAULT_APP_TITLE: &str = "statement-relay";

/// Environment variable holding the bearer token for the completions endpoint.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Configuration for the upload-and-forward service.
///
/// # Example
/// ```rust
/// use statement_relay::RelayConfig;
///
/// let config = RelayConfig::builder()
///     .upload_dir("/tmp/uploads")
///     .api_key("sk-test")
///     .timeout_secs(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.timeout_secs, 10);
/// ```
#[derive(Clone)]
pub struct RelayConfig {
    /// Socket address the HTTP server binds to. Default: `127.0.0.1:8000`.
    pub bind_addr: SocketAddr,

    /// Directory uploaded statements are written to. Default: `uploads`.
    ///
    /// Relative paths resolve against the working directory. Files are never
    /// cleaned up; an upload reusing a filename overwrites the earlier one.
    pub upload_dir: PathBuf,

    /// Chat-completions URL. Default: [`DEFAULT_API_URL`].
    pub api_url: String,

    /// Model identifier sent with every request. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Bearer token for the completions endpoint.
    ///
    /// `None` is accepted at startup; each relay then fails with
    /// [`RelayError::MissingApiKey`].
    pub api_key: Option<String>,

    /// Custom system prompt. If None, uses the built-in parser instruction.
    pub system_prompt: Option<String>,

    /// Value of the `HTTP-Referer` attribution header.
    pub referer: String,

    /// Value of the `X-Title` attribution header.
    pub app_title: String,

    /// Timeout for the completions call in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Largest accepted request body in bytes. Default: 25 MiB.
    pub max_upload_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            upload_dir: PathBuf::from("uploads"),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            system_prompt: None,
            referer: "http://localhost:3000".to_string(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            timeout_secs: 30,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bind_addr", &self.bind_addr)
            .field("upload_dir", &self.upload_dir)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl RelayConfig {
    /// Create a new builder for `RelayConfig`.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RelayConfig`].
#[derive(Debug)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the key only when one is present; blank values count as absent.
    pub fn maybe_api_key(mut self, key: Option<String>) -> Self {
        self.config.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.config.referer = referer.into();
        self
    }

    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = title.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RelayConfig, RelayError> {
        let c = &self.config;
        if c.timeout_secs == 0 {
            return Err(RelayError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if !(c.api_url.starts_with("http://") || c.api_url.starts_with("https://")) {
            return Err(RelayError::InvalidConfig(format!(
                "API URL must be http(s), got '{}'",
                c.api_url
            )));
        }
        if c.model.trim().is_empty() {
            return Err(RelayError::InvalidConfig("Model must not be empty".into()));
        }
        if c.upload_dir.as_os_str().is_empty() {
            return Err(RelayError::InvalidConfig(
                "Upload directory must not be empty".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(RelayError::InvalidConfig(
                "Maximum upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

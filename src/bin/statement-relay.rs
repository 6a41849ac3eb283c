//! CLI binary for statement-relay.
//!
//! A thin shim over the library crate that maps CLI flags to `RelayConfig`
//! and either serves the HTTP endpoint or relays a single local PDF.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use statement_relay::{serve, Envelope, Relay, RelayConfig, TransactionSummary};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve POST /upload-pdf on the default address
  statement-relay serve

  # Serve on all interfaces, storing uploads elsewhere
  statement-relay serve --bind 0.0.0.0:8000 --upload-dir /var/lib/statements

  # Relay one local statement and print the envelope
  statement-relay parse march.pdf

  # ...with a debit/credit summary on stderr
  statement-relay parse march.pdf --summary

  # Upload from another shell
  curl -F file=@march.pdf http://127.0.0.1:8000/upload-pdf

ENVIRONMENT VARIABLES:
  OPENROUTER_API_KEY      Bearer token for the completions endpoint
  RELAY_API_URL           Override the completions URL
  RELAY_MODEL             Override the model ID
  RUST_LOG                Override the log filter (e.g. statement_relay=debug)

  A .env file in the working directory (or any parent) is loaded first.
"#;

/// Relay PDF bank statements to an LLM and return transaction JSON.
#[derive(Parser, Debug)]
#[command(
    name = "statement-relay",
    version,
    about = "Relay PDF bank statements to an LLM and return transaction JSON",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    relay: RelayArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "RELAY_VERBOSE")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /upload-pdf.
    Serve {
        /// Address to bind.
        #[arg(long, env = "RELAY_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Relay one local PDF and print the envelope as JSON.
    Parse {
        /// Path to the statement PDF.
        input: PathBuf,

        /// Print a debit/credit summary to stderr.
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Args, Debug)]
struct RelayArgs {
    /// Directory uploaded statements are written to.
    #[arg(long, global = true, env = "RELAY_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Chat-completions URL.
    #[arg(long, global = true, env = "RELAY_API_URL", default_value = statement_relay::DEFAULT_API_URL)]
    api_url: String,

    /// Model ID sent with every request.
    #[arg(long, global = true, env = "RELAY_MODEL", default_value = statement_relay::DEFAULT_MODEL)]
    model: String,

    /// Bearer token for the completions endpoint.
    #[arg(long, global = true, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, global = true, env = "RELAY_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Value of the HTTP-Referer attribution header.
    #[arg(long, global = true, env = "RELAY_REFERER", default_value = "http://localhost:3000")]
    referer: String,

    /// Value of the X-Title attribution header.
    #[arg(
        long,
        global = true,
        env = "RELAY_APP_TITLE",
        default_value = statement_relay::DEFAULT_APP_TITLE
    )]
    app_title: String,

    /// Completions call timeout in seconds.
    #[arg(long, global = true, env = "RELAY_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Largest accepted upload in bytes.
    #[arg(long, global = true, env = "RELAY_MAX_UPLOAD", default_value_t = 25 * 1024 * 1024)]
    max_upload: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before clap reads `env` fallbacks.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let bind = match &cli.command {
        Command::Serve { bind } => Some(*bind),
        Command::Parse { .. } => None,
    };
    let config = build_config(&cli.relay, bind).await?;
    if config.api_key.is_none() {
        warn!(
            "{} not found; every relay will return an error envelope",
            statement_relay::API_KEY_ENV
        );
    }

    let relay = Relay::from_config(config).context("Failed to initialise relay")?;

    match cli.command {
        Command::Serve { .. } => serve(relay).await.context("Server stopped")?,
        Command::Parse { input, summary } => {
            let envelope = relay.file_envelope(&input).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&envelope).context("Failed to serialise envelope")?
            );
            if summary {
                print_summary(&envelope);
            }
            if !envelope.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Map CLI args to `RelayConfig`.
async fn build_config(args: &RelayArgs, bind: Option<SocketAddr>) -> Result<RelayConfig> {
    let mut builder = RelayConfig::builder()
        .upload_dir(&args.upload_dir)
        .api_url(&args.api_url)
        .model(&args.model)
        .maybe_api_key(args.api_key.clone())
        .referer(&args.referer)
        .app_title(&args.app_title)
        .timeout_secs(args.timeout)
        .max_upload_bytes(args.max_upload);

    if let Some(addr) = bind {
        builder = builder.bind_addr(addr);
    }

    if let Some(ref path) = args.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(envelope: &Envelope) {
    match envelope.typed_transactions() {
        Some(Ok(txs)) => {
            let s = TransactionSummary::from_transactions(&txs);
            eprintln!(
                "{} {} transactions  debits {:.2}  credits {:.2}  net {:.2}",
                green("✔"),
                bold(&s.count.to_string()),
                s.total_debits,
                s.total_credits,
                s.net()
            );
        }
        Some(Err(e)) => eprintln!("{} reply does not match the transaction shape: {e}", red("✘")),
        None => eprintln!("{} relay failed", red("✘")),
    }
}

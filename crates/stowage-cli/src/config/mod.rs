//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── minio: MinioConfig          # Endpoint, credentials, TLS, default bucket
//! ├── fetch_timeout_secs: u64     # Timeout for network upload sources
//! └── command: Command            # bucket / object subcommand
//! ```
//!
//! All connection settings can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! stowage --minio-access-key minioadmin --minio-secret-key minioadmin bucket list
//!
//! # Or via environment variables
//! MINIO_ACCESS_KEY=minioadmin MINIO_SECRET_KEY=minioadmin stowage object list photos
//! ```

use std::time::Duration;

use clap::Parser;
use stowage_minio::MinioConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TRACING_TARGET_STARTUP;
use crate::command::Command;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "stowage")]
#[command(about = "Manage MinIO buckets and objects")]
#[command(version)]
pub struct Cli {
    /// MinIO connection configuration.
    #[clap(flatten)]
    pub minio: MinioConfig,

    /// Timeout in seconds for fetching a network upload source.
    #[arg(long, env = "STOWAGE_FETCH_TIMEOUT_SECS", default_value_t = 300)]
    pub fetch_timeout_secs: u64,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so command output on stdout stays machine-readable.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Builds the HTTP client used to fetch network upload sources.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.fetch_timeout_secs))
            .build()
    }

    /// Logs the effective configuration without secrets.
    pub fn log_config(&self) {
        tracing::info!(
            target: TRACING_TARGET_STARTUP,
            base_url = %self.minio.base_url(),
            bucket = %self.minio.bucket(),
            fetch_timeout_secs = self.fetch_timeout_secs,
            command = self.command.name(),
            "configuration loaded"
        );

        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            dotenv = cfg!(feature = "dotenv"),
            "build information"
        );
    }
}

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;
use std::time::Instant;

use anyhow::Context;
use stowage_minio::MinioClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "stowage_cli::startup";
pub const TRACING_TARGET_COMMAND: &str = "stowage_cli::command";
pub const TRACING_TARGET_SHUTDOWN: &str = "stowage_cli::shutdown";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log_config();

    cli.minio
        .validate()
        .context("invalid MinIO configuration")?;

    let default_bucket = cli.minio.bucket().to_owned();
    let http = cli.http_client().context("failed to create HTTP client")?;
    let client = MinioClient::new(cli.minio).context("failed to create MinIO client")?;
    client
        .test_connection()
        .await
        .context("failed to connect to MinIO")?;
    let service = client.into_service().with_http_client(http);

    let name = cli.command.name();
    let started_at = Instant::now();

    let mut stdout = std::io::stdout().lock();
    cli.command
        .execute(&service, &default_bucket, &mut stdout)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        command = name,
        elapsed = ?started_at.elapsed(),
        "command finished"
    );

    Ok(())
}

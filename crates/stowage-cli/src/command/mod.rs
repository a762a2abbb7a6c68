//! CLI subcommands.
//!
//! ```text
//! stowage bucket exists|create|remove|list
//! stowage object upload|list|get|remove|url
//! ```
//!
//! Bucket arguments default to the configured default bucket. Listings are
//! printed as JSON.

mod bucket;
mod object;

use std::io::Write;

pub use bucket::BucketCommand;
use clap::Subcommand;
pub use object::ObjectCommand;
use serde::Serialize;
use stowage_core::StorageService;

/// Top-level subcommand.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage buckets.
    #[command(subcommand)]
    Bucket(BucketCommand),

    /// Manage objects.
    #[command(subcommand)]
    Object(ObjectCommand),
}

impl Command {
    /// Returns the command name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bucket(command) => command.name(),
            Self::Object(command) => command.name(),
        }
    }

    /// Runs the command, writing its result to `out`.
    pub async fn execute(
        self,
        service: &StorageService,
        default_bucket: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match self {
            Self::Bucket(command) => command.execute(service, default_bucket, out).await,
            Self::Object(command) => command.execute(service, default_bucket, out).await,
        }
    }
}

/// Writes a value as pretty-printed JSON followed by a newline.
fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

use std::io::Write;

use anyhow::Context;
use clap::{Args, Subcommand};
use stowage_core::StorageService;

use super::write_json;

/// Optional bucket argument, falling back to the configured default.
#[derive(Debug, Clone, Default, Args)]
pub struct BucketArg {
    /// Bucket name (defaults to --minio-bucket)
    pub bucket: Option<String>,
}

impl BucketArg {
    /// Resolves the bucket name.
    pub fn resolve<'a>(&'a self, default_bucket: &'a str) -> &'a str {
        self.bucket.as_deref().unwrap_or(default_bucket)
    }
}

/// Bucket subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum BucketCommand {
    /// Print whether a bucket exists.
    Exists(BucketArg),
    /// Create a bucket.
    Create(BucketArg),
    /// Remove an empty bucket.
    Remove(BucketArg),
    /// List all buckets as JSON.
    List,
}

impl BucketCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exists(_) => "bucket exists",
            Self::Create(_) => "bucket create",
            Self::Remove(_) => "bucket remove",
            Self::List => "bucket list",
        }
    }

    pub async fn execute(
        self,
        service: &StorageService,
        default_bucket: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match self {
            Self::Exists(arg) => {
                let bucket = arg.resolve(default_bucket);
                let exists = service
                    .bucket_exists(bucket)
                    .await
                    .with_context(|| format!("failed to check bucket '{bucket}'"))?;
                writeln!(out, "{exists}")?;
            }
            Self::Create(arg) => {
                let bucket = arg.resolve(default_bucket);
                service
                    .create_bucket(bucket)
                    .await
                    .with_context(|| format!("failed to create bucket '{bucket}'"))?;
                writeln!(out, "created bucket '{bucket}'")?;
            }
            Self::Remove(arg) => {
                let bucket = arg.resolve(default_bucket);
                service
                    .remove_bucket(bucket)
                    .await
                    .with_context(|| format!("failed to remove bucket '{bucket}'"))?;
                writeln!(out, "removed bucket '{bucket}'")?;
            }
            Self::List => {
                let buckets = service
                    .list_buckets()
                    .await
                    .context("failed to list buckets")?;
                write_json(out, &buckets)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stowage_core::mock::MemoryProvider;

    use super::*;

    async fn run(service: &StorageService, command: BucketCommand) -> anyhow::Result<String> {
        let mut out = Vec::new();
        command.execute(service, "default", &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_bucket_commands() {
        let service = StorageService::new(MemoryProvider::new());

        let out = run(&service, BucketCommand::Exists(BucketArg::default())).await.unwrap();
        assert_eq!(out, "false\n");

        run(&service, BucketCommand::Create(BucketArg::default())).await.unwrap();
        let out = run(&service, BucketCommand::Create(BucketArg {
            bucket: Some("photos".into()),
        }))
        .await
        .unwrap();
        assert_eq!(out, "created bucket 'photos'\n");

        let out = run(&service, BucketCommand::List).await.unwrap();
        let buckets: serde_json::Value = serde_json::from_str(&out).unwrap();
        let names: Vec<_> = buckets
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["default", "photos"]);

        run(&service, BucketCommand::Remove(BucketArg::default())).await.unwrap();
        let out = run(&service, BucketCommand::Exists(BucketArg::default())).await.unwrap();
        assert_eq!(out, "false\n");
    }

    #[tokio::test]
    async fn test_create_existing_bucket_reports_context() {
        let service = StorageService::new(MemoryProvider::new());
        run(&service, BucketCommand::Create(BucketArg::default())).await.unwrap();

        let error = run(&service, BucketCommand::Create(BucketArg::default()))
            .await
            .unwrap_err();
        assert_eq!(
            format!("{error:#}"),
            "failed to create bucket 'default': bucket 'default' already exists"
        );
    }
}

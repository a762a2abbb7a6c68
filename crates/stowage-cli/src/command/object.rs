use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use serde_json::json;
use stowage_core::StorageService;

use super::bucket::BucketArg;
use super::write_json;

/// Source of an upload: exactly one of `--file` or `--url`.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct UploadSource {
    /// Local file to upload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// HTTP(S) URL to fetch and upload
    #[arg(long)]
    pub url: Option<String>,
}

/// Object subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ObjectCommand {
    /// Upload an object from a local file or a URL.
    Upload {
        /// Object key
        key: String,

        #[command(flatten)]
        source: UploadSource,

        /// Content type (local files default to a guess from the extension)
        #[arg(long)]
        content_type: Option<String>,

        #[command(flatten)]
        bucket: BucketArg,
    },

    /// List every object in a bucket as JSON.
    List {
        #[command(flatten)]
        bucket: BucketArg,
    },

    /// Download an object to a local file.
    Get {
        /// Object key
        key: String,

        /// Output path (defaults to the last segment of the key)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        bucket: BucketArg,
    },

    /// Remove objects by key, or every object with --all.
    Remove {
        /// Object keys
        #[arg(long = "key", short = 'k')]
        keys: Vec<String>,

        /// Remove every object in the bucket
        #[arg(long, conflicts_with = "keys")]
        all: bool,

        #[command(flatten)]
        bucket: BucketArg,
    },

    /// Print a presigned GET URL for an object.
    Url {
        /// Object key
        key: String,

        #[command(flatten)]
        bucket: BucketArg,
    },
}

impl ObjectCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "object upload",
            Self::List { .. } => "object list",
            Self::Get { .. } => "object get",
            Self::Remove { .. } => "object remove",
            Self::Url { .. } => "object url",
        }
    }

    pub async fn execute(
        self,
        service: &StorageService,
        default_bucket: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        match self {
            Self::Upload {
                key,
                source,
                content_type,
                bucket,
            } => {
                let bucket = bucket.resolve(default_bucket);
                let result = match (source.file, source.url) {
                    (Some(path), _) => service
                        .upload_object_from_local(bucket, &key, &path, content_type.as_deref())
                        .await
                        .with_context(|| format!("failed to upload '{}'", path.display()))?,
                    (None, Some(url)) => service
                        .upload_object_from_network(bucket, &key, &url)
                        .await
                        .with_context(|| format!("failed to upload from '{url}'"))?,
                    (None, None) => bail!("either --file or --url is required"),
                };

                write_json(out, &json!({
                    "bucket": result.bucket,
                    "key": result.key,
                    "size": result.size,
                    "content_type": result.content_type,
                    "etag": result.etag,
                    "elapsed_ms": result.duration.as_millis() as u64,
                }))?;
            }
            Self::List { bucket } => {
                let bucket = bucket.resolve(default_bucket);
                let objects = service
                    .list_objects(bucket)
                    .await
                    .with_context(|| format!("failed to list objects in '{bucket}'"))?;
                write_json(out, &objects)?;
            }
            Self::Get {
                key,
                output,
                bucket,
            } => {
                let bucket = bucket.resolve(default_bucket);
                let output = output.unwrap_or_else(|| default_output_path(&key));

                let object = service
                    .get_object(bucket, &key)
                    .await
                    .with_context(|| format!("failed to get '{key}' from '{bucket}'"))?;
                let written = object
                    .write_to_file(&output)
                    .await
                    .with_context(|| format!("failed to write '{}'", output.display()))?;

                writeln!(out, "wrote {written} bytes to {}", output.display())?;
            }
            Self::Remove { keys, all, bucket } => {
                let bucket = bucket.resolve(default_bucket);
                if keys.is_empty() && !all {
                    bail!("no keys given, pass --key or --all");
                }

                let count = keys.len();
                service
                    .remove_objects(bucket, keys)
                    .await
                    .with_context(|| format!("failed to remove objects from '{bucket}'"))?;

                if all {
                    writeln!(out, "removed every object from '{bucket}'")?;
                } else {
                    writeln!(out, "removed {count} object(s) from '{bucket}'")?;
                }
            }
            Self::Url { key, bucket } => {
                let bucket = bucket.resolve(default_bucket);
                let url = service
                    .get_object_url(bucket, &key)
                    .await
                    .with_context(|| format!("failed to presign '{key}' in '{bucket}'"))?;
                writeln!(out, "{url}")?;
            }
        }

        Ok(())
    }
}

/// Returns the last segment of an object key as a local file name.
fn default_output_path(key: &str) -> PathBuf {
    let name = key
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("object");
    PathBuf::from(name)
}

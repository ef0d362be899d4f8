//! Helpers for copying files and directories between the local file system
//! and a single S3 (or S3-compatible) bucket.
//!
//! All operations run through a [`SyncContext`], which pairs an
//! [`ObjectStoreClient`] with a bucket name resolved once at construction
//! (explicit parameter first, then the `DEFAULT_S3_BUCKET_NAME` environment
//! variable). Production code wraps the AWS SDK via [`S3StoreClient`]; tests
//! can substitute any in-memory implementation of the trait.
//!
//! ```no_run
//! use s3_sync_tools::{S3StoreClient, SyncContext, TransferOptions};
//!
//! # async fn run() -> Result<(), s3_sync_tools::SyncError> {
//! let store = S3StoreClient::from_env(None).await;
//! let ctx = SyncContext::new(store, Some("my-bucket"))?;
//! let opts = TransferOptions::new();
//!
//! // Uploading ./assets into "site" writes keys under "site/assets".
//! let prefix = ctx.sync_up("./assets", "site", &opts).await?;
//! let local = ctx.sync_down(&prefix, "/tmp/restore", true, &opts).await?;
//! # let _ = local;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod s3;
mod utils;

pub use config::{DEFAULT_BUCKET_ENV, resolve_bucket_name};
pub use error::SyncError;
pub use s3::{ListPage, ObjectStoreClient, S3StoreClient, SyncContext, TransferOptions};

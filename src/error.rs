//! Error types for bucket sync operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while copying files between the local
/// file system and the bucket.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No bucket name was given and the environment provides no default.
    #[error(
        "bucket name must be set by parameter or the \
         'DEFAULT_S3_BUCKET_NAME' environment variable"
    )]
    MissingBucketName,

    /// A local root argument does not exist or is not a directory.
    #[error("local path must be a directory: {0}")]
    NotADirectory(PathBuf),

    /// The requested object does not exist in the bucket.
    #[error("object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Any other failure raised by the storage provider. Propagated
    /// unchanged, never retried or suppressed.
    #[error("storage provider error: {message}")]
    Provider { message: String },

    /// Local file-system failure.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },

    /// A listing page claimed truncation but carried no continuation
    /// token. Pagination could not make progress.
    #[error("listing under '{prefix}' reported truncation without a continuation token")]
    MissingContinuationToken { prefix: String },
}

impl SyncError {
    pub(crate) fn io(path: impl Into<String>, err: impl ToString) -> Self {
        SyncError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

//! Bucket name resolution.

use std::env;

use crate::error::SyncError;

/// Environment variable that supplies the process-wide default bucket.
pub const DEFAULT_BUCKET_ENV: &str = "DEFAULT_S3_BUCKET_NAME";

/// Resolves the bucket name for a sync context.
///
/// An explicit non-empty `bucket_name` wins; otherwise the
/// `DEFAULT_S3_BUCKET_NAME` environment variable is consulted. Exactly one
/// non-empty value must resolve or the call fails before any I/O.
pub fn resolve_bucket_name(bucket_name: Option<&str>) -> Result<String, SyncError> {
    if let Some(name) = bucket_name
        && !name.is_empty()
    {
        return Ok(name.to_string());
    }
    match env::var(DEFAULT_BUCKET_ENV) {
        Ok(name) if !name.is_empty() => Ok(name),
        _ => Err(SyncError::MissingBucketName),
    }
}

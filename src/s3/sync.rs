//! Sync operations between a local directory tree and a key prefix.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::resolve_bucket_name;
use crate::error::SyncError;
use crate::s3::client::{ObjectStoreClient, TransferOptions};
use crate::s3::mapping;

/// One bucket plus the client used to reach it.
///
/// The bucket name is resolved once at construction, from the explicit
/// parameter or the `DEFAULT_S3_BUCKET_NAME` environment variable. All
/// operations run one transfer at a time; the first provider failure
/// aborts the operation and propagates, with no rollback of transfers
/// that already completed.
pub struct SyncContext<C: ObjectStoreClient> {
    store: C,
    bucket: String,
}

impl<C: ObjectStoreClient> SyncContext<C> {
    /// Creates a context, resolving the bucket name before any I/O.
    pub fn new(store: C, bucket_name: Option<&str>) -> Result<Self, SyncError> {
        let bucket = resolve_bucket_name(bucket_name)?;
        Ok(Self { store, bucket })
    }

    /// The resolved bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The injected store client.
    pub fn store(&self) -> &C {
        &self.store
    }

    /// Copies one object to one local file.
    ///
    /// With `overwrite` disabled an existing destination file is left
    /// untouched and the transfer is skipped. The parent directory of
    /// `local_file` must already exist.
    pub async fn download_file(
        &self,
        key: &str,
        local_file: impl AsRef<Path>,
        overwrite: bool,
        opts: &TransferOptions,
    ) -> Result<(), SyncError> {
        let local_file = local_file.as_ref();
        if !overwrite && local_file.is_file() {
            debug!("file {} is already available, skipping it", local_file.display());
            return Ok(());
        }
        debug!("copying s3 object {} to {}", key, local_file.display());
        self.store
            .download_file(&self.bucket, key, local_file, opts)
            .await
    }

    /// Copies one local file to one object, replacing any existing object.
    pub async fn upload_file(
        &self,
        local_file: impl AsRef<Path>,
        key: &str,
        opts: &TransferOptions,
    ) -> Result<(), SyncError> {
        let local_file = local_file.as_ref();
        debug!("copying {} to s3 object {}", local_file.display(), key);
        self.store
            .upload_file(&self.bucket, local_file, key, opts)
            .await
    }

    /// Downloads every object under `remote_prefix` into `local_root`.
    ///
    /// The prefix's own name is nested under `local_root`: downloading
    /// `test_dir/a` into `/tmp/dest` writes under `/tmp/dest/a`. Keys ending
    /// in `/` are pseudo-directory markers and are skipped. Returns the
    /// final local directory, which may be empty if nothing matched.
    pub async fn sync_down(
        &self,
        remote_prefix: &str,
        local_root: impl AsRef<Path>,
        overwrite: bool,
        opts: &TransferOptions,
    ) -> Result<PathBuf, SyncError> {
        let local_root = local_root.as_ref();
        if !local_root.is_dir() {
            return Err(SyncError::NotADirectory(local_root.to_path_buf()));
        }

        let final_dir = mapping::final_local_dir(local_root, remote_prefix);
        for key in self.list_keys(remote_prefix).await? {
            if key.ends_with('/') {
                debug!("skipping directory marker {}", key);
                continue;
            }
            let local_path = mapping::local_path_for_key(&final_dir, remote_prefix, &key);
            if !overwrite && local_path.is_file() {
                debug!("file {} is already available, skipping it", local_path.display());
                continue;
            }
            debug!("copying s3 object {} to {}", key, local_path.display());
            if let Some(parent) = local_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| SyncError::io(parent.display().to_string(), e))?;
            }
            self.store
                .download_file(&self.bucket, &key, &local_path, opts)
                .await?;
        }

        Ok(final_dir)
    }

    /// Uploads every file under `local_root` to keys under `remote_prefix`.
    ///
    /// The directory's own name is nested under the prefix: uploading `a/x`
    /// into `y` writes keys under `y/x`. Directories themselves are never
    /// transferred; existing remote objects are always replaced. Returns the
    /// final prefix even when the directory contained no files.
    pub async fn sync_up(
        &self,
        local_root: impl AsRef<Path>,
        remote_prefix: &str,
        opts: &TransferOptions,
    ) -> Result<String, SyncError> {
        let local_root = local_root.as_ref();
        if !local_root.is_dir() {
            return Err(SyncError::NotADirectory(local_root.to_path_buf()));
        }

        let final_prefix = mapping::final_remote_prefix(remote_prefix, local_root);
        debug!(
            "uploading dir {} to s3 prefix {}",
            local_root.display(),
            final_prefix
        );
        for entry in WalkDir::new(local_root) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| local_root.display().to_string());
                SyncError::io(path, e)
            })?;
            if !entry.file_type().is_file() {
                // s3 has no directories, just keys with prefixes
                continue;
            }
            let relative = entry.path().strip_prefix(local_root).unwrap_or(entry.path());
            let key = mapping::key_for_local_file(&final_prefix, relative);
            debug!("copying {} to s3 object {}", entry.path().display(), key);
            self.store
                .upload_file(&self.bucket, entry.path(), &key, opts)
                .await?;
        }

        Ok(final_prefix)
    }

    /// Lists every key under `prefix`, following continuation tokens until
    /// the provider reports no further truncation.
    ///
    /// Zero matches is a soft condition: a warning is emitted and an empty
    /// sequence is returned. A truncated page without a continuation token
    /// is a protocol error.
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, SyncError> {
        let mut keys: Vec<String> = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut first_page = true;

        loop {
            let page = self
                .store
                .list_page(&self.bucket, prefix, continuation_token.as_deref())
                .await?;
            if first_page && page.key_count == 0 {
                warn!("no objects found under prefix '{}'", prefix);
            }
            first_page = false;
            keys.extend(page.keys);
            if !page.is_truncated {
                break;
            }
            match page.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => {
                    return Err(SyncError::MissingContinuationToken {
                        prefix: prefix.to_string(),
                    });
                }
            }
        }

        Ok(keys)
    }
}

use std::path::{Path, PathBuf};
use std::time::Instant;

use bucket_crypto::BlobHasher;
use bucket_types::{BlobId, UploadInstant};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Prefix of in-flight staging files. Ids starting with `.` never resolve,
/// so staging files are invisible to fetches.
pub(crate) const STAGING_PREFIX: &str = ".upload-";

/// An upload in progress.
///
/// Each chunk passed to [`write`](Self::write) is fed to the digest and
/// appended to a staging file in the same step. [`commit`](Self::commit)
/// renames the staging file onto the resulting [`BlobId`]. Dropping an
/// uncommitted upload deletes the staging file.
pub struct BlobUpload {
    hasher: BlobHasher,
    filename: String,
    root: PathBuf,
    started: Instant,
    // Declared before `staging` so the handle is closed before the unlink.
    file: File,
    staging: StagingFile,
}

impl BlobUpload {
    pub(crate) async fn create(
        root: &Path,
        instant: UploadInstant,
        filename: &str,
    ) -> StoreResult<Self> {
        let staging_path = root.join(format!("{STAGING_PREFIX}{}.part", Uuid::now_v7()));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging_path)
            .await
            .map_err(|e| StoreError::write_failure(&staging_path, e))?;
        debug!(staging = %staging_path.display(), salt = %instant, "upload started");

        Ok(Self {
            hasher: BlobHasher::salted(instant),
            filename: filename.to_string(),
            root: root.to_path_buf(),
            started: Instant::now(),
            file,
            staging: StagingFile::new(staging_path),
        })
    }

    /// Hash and persist the next chunk.
    pub async fn write(&mut self, chunk: &[u8]) -> StoreResult<()> {
        self.hasher.update(chunk);
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| StoreError::write_failure(&self.staging.path, e))
    }

    /// Content bytes received so far.
    pub fn bytes_written(&self) -> u64 {
        self.hasher.content_len()
    }

    /// Finish the digest and move the content to its final name.
    pub async fn commit(self) -> StoreResult<BlobId> {
        // `file` is bound last so an early return closes it before the
        // staging guard unlinks.
        let Self {
            hasher,
            filename,
            root,
            started,
            staging,
            mut file,
        } = self;

        file.flush()
            .await
            .map_err(|e| StoreError::write_failure(&staging.path, e))?;
        drop(file);

        let id = hasher.finish(&filename);
        let target = root.join(id.as_str());
        if fs::try_exists(&target).await.unwrap_or(false) {
            warn!(id = %id, "identifier collision, replacing existing blob");
        }
        fs::rename(&staging.path, &target)
            .await
            .map_err(|e| StoreError::write_failure(&target, e))?;
        staging.persisted();

        info!(
            id = %id,
            bytes = hasher.content_len(),
            elapsed = ?started.elapsed(),
            "blob stored"
        );
        Ok(id)
    }
}

impl std::fmt::Debug for BlobUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobUpload")
            .field("filename", &self.filename)
            .field("staging_path", &self.staging.path)
            .field("bytes_written", &self.bytes_written())
            .finish()
    }
}

/// Path of a staging file, removed on drop unless it was persisted.
#[derive(Debug)]
struct StagingFile {
    path: PathBuf,
    keep: bool,
}

impl StagingFile {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn persisted(mut self) {
        self.keep = true;
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        // A single unlink; cheap enough to run inline on a runtime thread.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(staging = %self.path.display(), "abandoned upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                staging = %self.path.display(),
                "failed to remove abandoned upload: {e}"
            ),
        }
    }
}

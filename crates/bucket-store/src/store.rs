use std::path::{Path, PathBuf};

use bucket_types::{BlobId, UploadClock};
use tokio::fs;

use crate::error::{StoreError, StoreResult};
use crate::upload::BlobUpload;

/// Blob store rooted at a single directory.
///
/// The store is the only reader and writer of the root. It holds no
/// mutable state besides the upload clock, so one instance is shared by
/// all requests.
#[derive(Debug)]
pub struct BlobStore {
    root: PathBuf,
    clock: UploadClock,
}

impl BlobStore {
    /// Open a store on an existing directory.
    ///
    /// The root is created during bootstrap (see [`crate::ensure_root`]), not
    /// here.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RootUnavailable(root));
        }
        Ok(Self {
            root,
            clock: UploadClock::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a streaming upload salted with the next upload instant.
    pub async fn begin_upload(&self, filename: &str) -> StoreResult<BlobUpload> {
        BlobUpload::create(&self.root, self.clock.tick(), filename).await
    }

    /// Store a complete buffer and return its id.
    pub async fn upload(&self, filename: &str, content: &[u8]) -> StoreResult<BlobId> {
        let mut upload = self.begin_upload(filename).await?;
        upload.write(content).await?;
        upload.commit().await
    }

    #[cfg(test)]
    pub(crate) async fn upload_at(
        &self,
        instant: bucket_types::UploadInstant,
        filename: &str,
        content: &[u8],
    ) -> StoreResult<BlobId> {
        let mut upload = BlobUpload::create(&self.root, instant, filename).await?;
        upload.write(content).await?;
        upload.commit().await
    }

    /// Resolve a client-supplied id to the path of an existing blob.
    pub async fn locate(&self, raw: &str) -> StoreResult<PathBuf> {
        let id = BlobId::parse(raw)?;
        if !id.fits_name_limit() {
            return Err(StoreError::NotFound(id));
        }
        let path = self.path_of(&id);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(StoreError::NotFound(id)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    #[cfg(test)]
    pub(crate) async fn read(&self, raw: &str) -> StoreResult<Vec<u8>> {
        let path = self.locate(raw).await?;
        Ok(fs::read(path).await?)
    }

    fn path_of(&self, id: &BlobId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

use bucket_types::{BlobId, UploadInstant};

/// Incremental, time-salted BLAKE3 hasher for uploaded blobs.
///
/// The upload instant's RFC 3339 rendering is absorbed first, then every
/// content chunk in order. Identical content hashed under two different
/// instants produces two different digests.
#[derive(Clone)]
pub struct BlobHasher {
    inner: blake3::Hasher,
    salt: UploadInstant,
    content_len: u64,
}

impl BlobHasher {
    /// Start a digest salted with `instant`.
    pub fn salted(instant: UploadInstant) -> Self {
        let mut inner = blake3::Hasher::new();
        inner.update(instant.to_rfc3339().as_bytes());
        Self {
            inner,
            salt: instant,
            content_len: 0,
        }
    }

    /// Absorb the next chunk of content.
    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.inner.update(chunk);
        self.content_len += chunk.len() as u64;
        self
    }

    /// Number of content bytes absorbed so far (the salt is not counted).
    pub fn content_len(&self) -> u64 {
        self.content_len
    }

    /// The raw 32-byte digest of everything absorbed so far.
    pub fn digest(&self) -> [u8; 32] {
        *self.inner.finalize().as_bytes()
    }

    /// Finish into a [`BlobId`], keeping the extension of `filename`.
    pub fn finish(&self, filename: &str) -> BlobId {
        BlobId::from_digest(&self.digest(), filename)
    }
}

impl std::fmt::Debug for BlobHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobHasher")
            .field("salt", &self.salt)
            .field("content_len", &self.content_len)
            .finish()
    }
}

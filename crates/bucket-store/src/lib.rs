//! Filesystem blob storage for Bucket.
//!
//! Every uploaded object is one file directly under the storage root, named
//! by its [`BlobId`](bucket_types::BlobId): the BLAKE3 digest of the upload
//! instant followed by the content, plus the original file extension.
//!
//! # Design Rules
//!
//! 1. Uploads are hashed while they stream into a hidden staging file, then
//!    renamed onto their id. Content is read exactly once.
//! 2. Renaming replaces an existing file: on an id collision the last
//!    upload wins.
//! 3. An upload that is dropped before commit removes its staging file.
//! 4. Ids presented for lookup are validated before touching the
//!    filesystem; nothing outside the root is reachable.
//! 5. Objects are never modified or deleted once stored.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod bootstrap;
pub mod error;
pub mod store;
pub mod upload;

pub use bootstrap::ensure_root;
pub use error::{StoreError, StoreResult};
pub use store::BlobStore;
pub use upload::BlobUpload;

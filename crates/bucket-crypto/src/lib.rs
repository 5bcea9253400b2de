//! Hashing primitives for Bucket.
//!
//! Blob identifiers are BLAKE3 digests over the upload instant followed by
//! the uploaded bytes. The digest is built incrementally so uploads can be
//! hashed while they stream to disk.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::BlobHasher;

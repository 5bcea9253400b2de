//! Foundation types for Bucket.
//!
//! Every other Bucket crate depends on `bucket-types`.
//!
//! # Key Types
//!
//! - [`BlobId`] — Time-salted content identifier, also the storage key
//! - [`UploadInstant`] — Nanosecond timestamp that salts each upload digest
//! - [`UploadClock`] — Source of strictly increasing upload instants

pub mod blob;
pub mod error;
pub mod temporal;

pub use blob::{extension_of, BlobId, DIGEST_HEX_LEN, MAX_ID_LEN};
pub use error::TypeError;
pub use temporal::{UploadClock, UploadInstant};

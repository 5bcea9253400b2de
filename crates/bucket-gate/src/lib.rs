//! Access gate for Bucket.
//!
//! Every request must pass the [`AccessGate`] before any storage logic runs.
//! The gate compares the `Authorization` header against the shared secret
//! loaded at startup and produces an [`AccessDecision`].
//!
//! # Admission Rule
//!
//! A request is admitted iff its header is exactly `Bearer <secret>`: the
//! literal scheme, one space, and the secret, byte-for-byte. Rejections
//! carry an [`AuthError`] saying why, which callers log but never expose;
//! every rejection looks the same from outside.

pub mod error;
pub mod gate;

pub use error::AuthError;
pub use gate::{AccessDecision, AccessGate, Credential, BEARER_SCHEME};

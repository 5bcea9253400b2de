//! HTTP server for Bucket.
//!
//! Exposes two bearer-gated endpoints over a [`BlobStore`](bucket_store::BlobStore):
//!
//! - `POST /upload` — multipart field `file`; answers `{"hashData": "<id>"}`
//! - `GET /fetch?hash=<id>` — streams the stored bytes back
//!
//! Every request is wrapped by the access log, then the bearer gate, then
//! the handler. Rejected requests never reach the store.

pub mod access_log;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, TlsConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{UploadResponse, UPLOAD_FIELD};
pub use router::build_router;
pub use server::BucketServer;
pub use state::AppState;

use std::sync::Arc;

use bucket_gate::AccessGate;
use bucket_store::BlobStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared, read-only state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<BlobStore>,
    pub gate: Arc<AccessGate>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: BlobStore, gate: AccessGate, max_upload_bytes: usize) -> Self {
        Self {
            store: Arc::new(store),
            gate: Arc::new(gate),
            max_upload_bytes,
        }
    }

    /// Open the store and gate described by a validated config. The storage
    /// root must already exist.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = BlobStore::open(&config.storage_root)?;
        let gate = AccessGate::new(config.credential());
        Ok(Self::new(store, gate, config.max_upload_bytes))
    }
}

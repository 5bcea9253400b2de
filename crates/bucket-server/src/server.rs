use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Bucket blob server.
pub struct BucketServer {
    config: ServerConfig,
    state: AppState,
}

impl BucketServer {
    /// Validate the config and open the store. The storage root must exist.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let state = AppState::from_config(&config)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests, over TLS when the config enables it.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.config.bind_addr();
        let app = build_router(self.state).into_make_service_with_connect_info::<SocketAddr>();

        match self.config.tls() {
            Some(tls) => {
                let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await
                    .map_err(|e| ServerError::Config(format!("cannot load TLS material: {e}")))?;
                tracing::info!("bucket server listening on https://{addr}");
                axum_server::bind_rustls(addr, rustls).serve(app).await?;
            }
            None => {
                let listener = TcpListener::bind(addr).await?;
                tracing::info!("bucket server listening on http://{addr}");
                axum::serve(listener, app).await?;
            }
        }
        Ok(())
    }
}

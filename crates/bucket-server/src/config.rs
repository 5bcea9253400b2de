use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use bucket_gate::Credential;
use serde::{Deserialize, Deserializer};

use crate::error::{ServerError, ServerResult};

/// Resolved server configuration, loaded once at startup.
///
/// Field names follow the legacy `config.json` layout (`server_port`,
/// `api_key`, `use_https`, `https_cert_path`, `https_key_path`); unknown
/// fields are ignored.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_host")]
    pub bind_host: IpAddr,
    #[serde(default = "default_server_port", deserialize_with = "port")]
    pub server_port: u16,
    pub api_key: String,
    #[serde(default)]
    pub use_https: bool,
    #[serde(default = "default_https_port", deserialize_with = "port")]
    pub https_port: u16,
    #[serde(default)]
    pub https_cert_path: Option<PathBuf>,
    #[serde(default)]
    pub https_key_path: Option<PathBuf>,
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_server_port() -> u16 {
    8080
}

fn default_https_port() -> u16 {
    443
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

/// Ports may be written as numbers or, as in older configs, strings.
fn port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(n) => Ok(n),
        Port::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {s:?}"))),
    }
}

/// TLS material for HTTPS serving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl ServerConfig {
    /// Defaults for everything except the shared secret.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            bind_host: default_bind_host(),
            server_port: default_server_port(),
            api_key: api_key.into(),
            use_https: false,
            https_port: default_https_port(),
            https_cert_path: None,
            https_key_path: None,
            storage_root: default_storage_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }

    /// Read and validate a config file. `.json` files are parsed as JSON,
    /// anything else as TOML.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_toml_str(&text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> ServerResult<Self> {
        serde_json::from_str(text).map_err(|e| ServerError::Config(format!("invalid JSON config: {e}")))
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(format!("invalid TOML config: {e}")))
    }

    pub fn validate(&self) -> ServerResult<()> {
        if !self.credential().is_presentable() {
            return Err(ServerError::Config(
                "api_key must be non-empty and contain no whitespace".into(),
            ));
        }
        if self.use_https && self.tls().is_none() {
            return Err(ServerError::Config(
                "use_https requires https_cert_path and https_key_path".into(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ServerError::Config("max_upload_bytes must be positive".into()));
        }
        Ok(())
    }

    /// The expected bearer token.
    pub fn credential(&self) -> Credential {
        Credential::new(self.api_key.clone())
    }

    /// TLS material, when HTTPS is enabled and both paths are set.
    pub fn tls(&self) -> Option<TlsConfig> {
        if !self.use_https {
            return None;
        }
        let non_empty = |p: &Option<PathBuf>| p.clone().filter(|p| !p.as_os_str().is_empty());
        Some(TlsConfig {
            cert_path: non_empty(&self.https_cert_path)?,
            key_path: non_empty(&self.https_key_path)?,
        })
    }

    /// Listen address: the HTTPS port when TLS is on, else the plain port.
    pub fn bind_addr(&self) -> SocketAddr {
        let port = if self.use_https {
            self.https_port
        } else {
            self.server_port
        };
        SocketAddr::new(self.bind_host, port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr())
            .field("use_https", &self.use_https)
            .field("https_cert_path", &self.https_cert_path)
            .field("https_key_path", &self.https_key_path)
            .field("storage_root", &self.storage_root)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

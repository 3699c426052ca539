use std::{path::PathBuf, time::Duration};

use url::Url;
use user_service_core::database::{PoolSettings, StoreOptions};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_RPC_PORT: u16 = 50051;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub cors: CorsConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rpc_port: u16,
    /// Deadline for reading a request body.
    pub read_timeout: Duration,
    /// Deadline for producing a response.
    pub write_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    /// Bound on listing the whole collection.
    pub list_timeout: Duration,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Store URL with any password masked, for logging.
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<unparseable>".to_string(),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            list_timeout: self.list_timeout,
            pool: PoolSettings {
                max_connections: self.max_connections,
                connect_timeout: self.connect_timeout,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Where the effective list timeout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTimeoutSource {
    /// `LIST_TIMEOUT` was set.
    Env,
    /// `LIST_TIMEOUT` was unset; `WRITE_TIMEOUT` was reused.
    WriteTimeoutFallback,
    File,
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub list_timeout_source: ListTimeoutSource,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        Self {
            config_path: None,
            env_file_loaded: false,
            list_timeout_source: ListTimeoutSource::Default,
        }
    }
}

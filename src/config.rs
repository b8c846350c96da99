//! Configuration management for the console store
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! config file, environment variables (a `.env` file is honoured by the
//! binary), and CLI flags. Every section is optional in the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::session::FileSessionStorage;
use crate::app::{CacheConfig, ClientConfig, StoreConfig};
use crate::constants::{api, cache, env, http, limits, session};
use crate::errors::{AppError, ConfigError, ConfigResult, PersistResult, Result};

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "console-store.toml";

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Remote API settings
    pub api: ApiConfig,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Query cache capacities
    pub cache: CacheConfigToml,
    /// Session persistence
    pub session: SessionConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the users/products API
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    pub pool_max_per_host: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Client-side throttle; requests are never retried
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive_secs: Some(30),
            tcp_nodelay: true,
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfigToml {
    /// Distinct user queries kept before LRU eviction
    pub users_capacity: usize,
    /// Distinct product queries kept before LRU eviction
    pub products_capacity: usize,
}

impl Default for CacheConfigToml {
    fn default() -> Self {
        Self {
            users_capacity: cache::DEFAULT_CAPACITY,
            products_capacity: cache::DEFAULT_CAPACITY,
        }
    }
}

/// TOML-friendly session persistence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfigToml {
    /// Session file (None = `<config_dir>/console-store/session.json`)
    pub storage_path: Option<PathBuf>,
    /// Record name; a stored record under another name is ignored
    pub record_name: String,
}

impl Default for SessionConfigToml {
    fn default() -> Self {
        Self {
            storage_path: None,
            record_name: session::RECORD_NAME.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Runtime settings for an `AdminStore`
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.api.base_url.clone(),
            client: self.client.to_runtime_config(),
            cache: self.cache.to_runtime_config(),
        }
    }

    /// Session storage described by the `[session]` section
    pub fn session_storage(&self) -> PersistResult<FileSessionStorage> {
        let path = match &self.session.storage_path {
            Some(path) => path.clone(),
            None => FileSessionStorage::default_path()?,
        };
        Ok(FileSessionStorage::new(path, self.session.record_name.clone()))
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    ///
    /// CLI flags are applied by the caller on the returned value.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(ref path) => Some(path.clone()),
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `CONSOLE_*` overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(env::API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            debug!("API base URL overridden by {}", env::API_BASE_URL);
            self.api.base_url = base_url.trim().to_string();
        }
        if let Some(path) = lookup(env::SESSION_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("Session path overridden by {}", env::SESSION_PATH);
            self.session.storage_path = Some(PathBuf::from(path.trim()));
        }
    }

    /// Write the commented default configuration to `path`
    pub async fn write_default(path: &Path) -> ConfigResult<()> {
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
            }
        }

        tokio::fs::write(path, Self::generate_default_config_content())
            .await
            .map_err(io_error)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(format!("./{}", LOCAL_CONFIG_FILE))];
        if let Ok(path) = Self::get_default_config_path() {
            search_paths.push(path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir.join(session::APP_DIR).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Console Store Configuration
# You can customize any of these settings to suit your needs.
# Environment variables {} and {} override the file.

[api]
base_url = "{}"

[client]
# HTTP client settings; failed requests are never retried automatically
tcp_keepalive_secs = 30
tcp_nodelay = true
pool_idle_timeout_secs = {}
pool_max_per_host = {}
request_timeout_secs = {}
connect_timeout_secs = {}
rate_limit_rps = {}

[cache]
# Distinct queries kept per collection before least-recently-used eviction
users_capacity = {}
products_capacity = {}

[session]
# storage_path = "/path/to/session.json"  # Default: <config dir>/{}/{}
record_name = "{}"

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            env::API_BASE_URL,
            env::SESSION_PATH,
            api::DEFAULT_BASE_URL,
            http::POOL_IDLE_TIMEOUT.as_secs(),
            http::POOL_MAX_PER_HOST,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            limits::DEFAULT_RATE_LIMIT_RPS,
            cache::DEFAULT_CAPACITY,
            cache::DEFAULT_CAPACITY,
            session::APP_DIR,
            session::FILE_NAME,
            session::RECORD_NAME,
        )
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
        }
    }
}

impl CacheConfigToml {
    /// Convert to runtime CacheConfig
    pub fn to_runtime_config(&self) -> CacheConfig {
        CacheConfig {
            users_capacity: self.users_capacity,
            products_capacity: self.products_capacity,
        }
    }
}

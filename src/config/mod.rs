use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use crate::storage::local::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default = "default_countdown_interval", with = "humantime_serde")]
    pub countdown_interval: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_rest_path")]
    pub rest_path: String,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_store_key")]
    pub key: String,
}

/// Variables understood when no config file exists. The `SUPABASE_*`
/// names also override the backend section of a loaded file.
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default)]
    supabase_url: String,
    #[serde(default)]
    supabase_anon_key: String,
    #[serde(default)]
    supabase_table: String,
    board_port: Option<u16>,
    board_store_dir: Option<PathBuf>,
}

pub const DEFAULT_TABLE: &str = "gratitude_notes";

const fn default_port() -> u16 {
    8000
}

const fn default_countdown_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_rest_path() -> String {
    "rest/v1".to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".board")
}

fn default_store_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            backend: BackendConfig::default(),
            store: StoreConfig::default(),
            countdown_interval: default_countdown_interval(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            table: default_table(),
            rest_path: default_rest_path(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
            key: default_store_key(),
        }
    }
}

impl BackendConfig {
    /// Remote mode needs both a url and a key.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

impl EnvConfig {
    fn apply(self, config: &mut Config) {
        if !self.supabase_url.trim().is_empty() {
            config.backend.url = self.supabase_url;
        }
        if !self.supabase_anon_key.trim().is_empty() {
            config.backend.key = self.supabase_anon_key;
        }
        if !self.supabase_table.trim().is_empty() {
            config.backend.table = self.supabase_table;
        }
        if let Some(port) = self.board_port {
            config.port = port;
        }
        if let Some(dir) = self.board_store_dir {
            config.store.dir = dir;
        }
    }
}

fn read_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

fn load_from_file() -> Result<Option<Config>, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("BOARD_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return read_file(&config_path).map(Some);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return read_file("config.yaml").map(Some);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return read_file("config.example.yaml").map(Some);
    }

    Ok(None)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = load_from_file()?.unwrap_or_else(|| {
        tracing::info!("No config file found, loading configuration from environment variables");
        Config::default()
    });

    let overrides: EnvConfig = envy::from_env()
        .map_err(|e| format!("Failed to read configuration from environment variables: {e}"))?;
    overrides.apply(&mut config);

    if config.backend.is_configured() {
        tracing::info!("Remote backend configured, table '{}'", config.backend.table);
    } else {
        tracing::warn!("SUPABASE_URL or SUPABASE_ANON_KEY not set, running in local-only mode");
    }

    Ok(config)
}

//! Centralized configuration (environment variables + defaults).

use crate::storage::uploads::DEFAULT_MAX_UPLOAD_BYTES;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATA_FILE: &str = "data/animals.json";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_SCHEMA: &str = "standard";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// JSON document holding the whole record collection.
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Name of a built-in schema preset.
    pub schema_name: String,
    /// JSON rule table; takes precedence over `schema_name` when set.
    pub schema_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from the process environment (after loading `.env`, if any).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("BIND_ADDR must be host:port (got '{}'): {}", bind_raw, e))?;

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a positive integer (got '{}')", v))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        anyhow::ensure!(max_upload_bytes > 0, "MAX_UPLOAD_BYTES must be greater than zero");

        Ok(Self {
            bind_addr,
            data_file: PathBuf::from(get("DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())),
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())),
            max_upload_bytes,
            schema_name: get("ANIMAL_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            schema_file: get("ANIMAL_SCHEMA_FILE").map(PathBuf::from),
        })
    }
}

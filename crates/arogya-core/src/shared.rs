//! Shared configuration and helpers used across the workspace.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current Unix time in milliseconds (0 if the clock is before the epoch).
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Global application configuration for the gateway. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Display name used in logs and `/v1/status`.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Base directory for the sled DBs (remedy store and chat history are derived from this).
    pub storage_path: String,
    /// Optional JSON file replacing the built-in herb knowledge base.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    /// Optional JSON array of remedy records upserted into the remedy store at startup.
    #[serde(default)]
    pub remedies_path: Option<String>,
    /// Minimum score (0–100) for fuzzy herb search.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
}

fn default_fuzzy_threshold() -> u8 {
    crate::assistant::DEFAULT_FUZZY_THRESHOLD
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: env `AROGYA__*` > `AROGYA_CONFIG`
    /// path (default `config/gateway.toml`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("AROGYA_CONFIG").unwrap_or_else(|_| "config/gateway".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "Arogya Assistant")?
            .set_default("port", 8001_i64)?
            .set_default("storage_path", "./data")?
            .set_default("fuzzy_threshold", i64::from(default_fuzzy_threshold()))?;

        // `config::File::with_name` resolves the extension; a bare path is accepted as-is.
        let path = Path::new(&config_path);
        let with_ext = path.with_extension("toml");
        let builder = if path.is_file() {
            builder.add_source(config::File::from(path))
        } else if with_ext.is_file() {
            builder.add_source(config::File::from(with_ext.as_path()))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("AROGYA").separator("__"))
            .build()?;

        built.try_deserialize()
    }

    /// Directory of the sled DB holding remedy records.
    pub fn remedies_db_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("arogya_remedies")
    }

    /// Directory of the sled DB holding chat sessions and messages.
    pub fn history_db_path(&self) -> PathBuf {
        Path::new(&self.storage_path).join("arogya_history")
    }
}

//! Engine configuration via `reclaim.toml`
//!
//! On first open of a data directory a default `reclaim.toml` is written.
//! To change settings, edit the file and reopen the engine.

use reclaim_core::{validate_collection_name, ReclaimError, ReclaimResult, DEFAULT_SYSTEM_DATABASE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name placed in the engine data directory.
pub const CONFIG_FILE_NAME: &str = "reclaim.toml";

/// Default sweep interval in milliseconds
pub const DEFAULT_RECLAIM_INTERVAL_MS: u64 = 1000;

/// Engine configuration loaded from `reclaim.toml`.
///
/// # Example
///
/// ```toml
/// # How often the reclaimer sweeps dropped resources (milliseconds)
/// reclaim_interval_ms = 1000
/// start_reclaimer = true
/// system_database = "_system"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reclaimer sweep interval in milliseconds. Advisory only.
    #[serde(default = "default_reclaim_interval_ms")]
    pub reclaim_interval_ms: u64,
    /// Start the background reclaimer when the engine opens.
    #[serde(default = "default_start_reclaimer")]
    pub start_reclaimer: bool,
    /// Name of the undroppable system database.
    #[serde(default = "default_system_database")]
    pub system_database: String,
}

fn default_reclaim_interval_ms() -> u64 {
    DEFAULT_RECLAIM_INTERVAL_MS
}

fn default_start_reclaimer() -> bool {
    true
}

fn default_system_database() -> String {
    DEFAULT_SYSTEM_DATABASE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reclaim_interval_ms: default_reclaim_interval_ms(),
            start_reclaimer: default_start_reclaimer(),
            system_database: default_system_database(),
        }
    }
}

impl EngineConfig {
    /// Sweep interval as a `Duration`
    pub fn reclaim_interval(&self) -> Duration {
        Duration::from_millis(self.reclaim_interval_ms)
    }

    /// Check field values
    ///
    /// # Errors
    ///
    /// Returns an error for a zero interval or an invalid system database name.
    pub fn validate(&self) -> ReclaimResult<()> {
        if self.reclaim_interval_ms == 0 {
            return Err(ReclaimError::config(
                "reclaim_interval_ms must be greater than zero",
            ));
        }
        validate_collection_name(&self.system_database).map_err(|e| {
            ReclaimError::config(format!(
                "invalid system_database '{}': {}",
                self.system_database, e
            ))
        })?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# reclaimdb engine configuration
#
# How often the reclaimer sweeps dropped databases, collections and
# documents, in milliseconds. Advisory: a resource is freed on the first
# sweep after its last handle is released.
reclaim_interval_ms = 1000

# Start the background reclaimer when the engine opens (default: true).
# When false, call Engine::reclaimer().start() or sweep_now() yourself.
start_reclaimer = true

# Name of the system database. It always exists and cannot be dropped.
system_database = "_system"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> ReclaimResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReclaimError::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            ReclaimError::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> ReclaimResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> ReclaimResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReclaimError::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

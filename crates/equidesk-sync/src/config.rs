//! # Engine Configuration
//!
//! Configuration management for the sync engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     EQUIDESK_SYNC_STRATEGY=concurrent                                  │
//! │     EQUIDESK_MARKUP_PHARMACY_BPS=4500                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/equidesk/equidesk.toml (Linux)                           │
//! │     ~/Library/Application Support/com.equidesk.equidesk/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Sequential sync, rule-table markups, "info,equidesk=debug"         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # equidesk.toml
//! [pricing]
//! pharmacy_owner_bps = 4000
//! mixed_business_bps = 3000
//! stable_owner_bps = 1500
//! medical_adjustment_bps = 1000
//!
//! [sync]
//! strategy = "sequential"  # sequential | concurrent
//!
//! [logging]
//! filter = "info,equidesk=debug"
//! json = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use equidesk_core::MarkupTable;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Sync Strategy
// =============================================================================

/// How the orchestrator walks an item's destination modules.
///
/// Both strategies return results in fixed module order. Concurrent only
/// changes when each module's commit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// One module after another, in fixed order.
    #[default]
    Sequential,

    /// Every module as its own task.
    Concurrent,
}

impl std::fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStrategy::Sequential => write!(f, "sequential"),
            SyncStrategy::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl std::str::FromStr for SyncStrategy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "serial" => Ok(SyncStrategy::Sequential),
            "concurrent" | "parallel" => Ok(SyncStrategy::Concurrent),
            other => Err(SyncError::InvalidConfig(format!(
                "Unknown sync strategy: '{}'. Valid options: sequential, concurrent",
                other
            ))),
        }
    }
}

// =============================================================================
// Sync Settings
// =============================================================================

/// Sync behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub strategy: SyncStrategy,
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Logging settings, read by [`crate::telemetry::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info,equidesk=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
            json: false,
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Markup table used for suggested prices.
    #[serde(default)]
    pub pricing: MarkupTable,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (equidesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let max_bps = equidesk_core::MAX_MARKUP_PERCENTAGE * 100;
        for (name, bps) in [
            ("stable_owner_bps", self.pricing.stable_owner_bps),
            ("pharmacy_owner_bps", self.pricing.pharmacy_owner_bps),
            ("mixed_business_bps", self.pricing.mixed_business_bps),
        ] {
            if bps > max_bps {
                return Err(SyncError::InvalidConfig(format!(
                    "pricing.{} must be at most {} bps, got {}",
                    name, max_bps, bps
                )));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(strategy) = std::env::var("EQUIDESK_SYNC_STRATEGY") {
            match strategy.parse() {
                Ok(parsed) => {
                    debug!(strategy = %strategy, "Overriding sync strategy from environment");
                    self.sync.strategy = parsed;
                }
                Err(_) => warn!(strategy = %strategy, "Unknown sync strategy in environment"),
            }
        }

        for (var, slot) in [
            ("EQUIDESK_MARKUP_PHARMACY_BPS", &mut self.pricing.pharmacy_owner_bps),
            ("EQUIDESK_MARKUP_MIXED_BPS", &mut self.pricing.mixed_business_bps),
            ("EQUIDESK_MARKUP_STABLE_BPS", &mut self.pricing.stable_owner_bps),
        ] {
            if let Ok(value) = std::env::var(var) {
                if let Ok(bps) = value.parse::<u32>() {
                    debug!(var, bps, "Overriding markup from environment");
                    *slot = bps;
                }
            }
        }

        if let Ok(filter) = std::env::var("EQUIDESK_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "equidesk", "equidesk")
            .map(|dirs| dirs.config_dir().join("equidesk.toml"))
    }

    /// Returns the sync strategy.
    pub fn strategy(&self) -> SyncStrategy {
        self.sync.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("sequential".parse::<SyncStrategy>().unwrap(), SyncStrategy::Sequential);
        assert_eq!("Parallel".parse::<SyncStrategy>().unwrap(), SyncStrategy::Concurrent);
        assert!("eventually".parse::<SyncStrategy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.strategy(), SyncStrategy::Sequential);
        assert_eq!(config.pricing, MarkupTable::default());
        assert_eq!(config.logging.filter, "info,equidesk=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [pricing]
            pharmacy_owner_bps = 4500

            [sync]
            strategy = "concurrent"
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.pharmacy_owner_bps, 4500);
        assert_eq!(config.pricing.stable_owner_bps, 1500);
        assert_eq!(config.strategy(), SyncStrategy::Concurrent);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.pricing.mixed_business_bps = 100_001;
        assert!(config.validate().is_err());

        config.pricing.mixed_business_bps = 3000;
        config.logging.filter = "  ".to_string();
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("equidesk-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("equidesk.toml");

        let mut config = EngineConfig::default();
        config.pricing.stable_owner_bps = 2000;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[pricing]"));
        assert!(contents.contains("[sync]"));

        let loaded = EngineConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.pricing.stable_owner_bps, 2000);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("equidesk-does-not-exist.toml");
        let config = EngineConfig::load_or_default(Some(path));
        assert_eq!(config.sync, SyncSettings::default());
    }
}

//! # Sync Error Types
//!
//! Error types for sync operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌──────────────────┐  ┌───────────────────┐  │
//! │  │  Whole attempt      │  │  Configuration   │  │  Per module       │  │
//! │  │  (SyncError)        │  │  (SyncError)     │  │ (ModuleCommitError│  │
//! │  │                     │  │                  │  │  → result.error)  │  │
//! │  │  ValidationFailed   │  │  InvalidConfig   │  │  Rejected         │  │
//! │  │  ModuleNotIn...     │  │  ConfigLoadFailed│  │  Unavailable      │  │
//! │  │  DestinationsChanged│  │  ConfigSaveFailed│  │  NotRegistered    │  │
//! │  │  SyncInFlight       │  │                  │  │                   │  │
//! │  └─────────────────────┘  └──────────────────┘  └───────────────────┘  │
//! │                                                                         │
//! │  Per-module errors never abort an attempt. They are turned into the    │
//! │  `error` text of that module's ModuleSyncResult.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use equidesk_core::{Module, ValidationReport};
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that stop a sync attempt before any module is touched, or that
/// come from loading configuration.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Attempt Errors
    // =========================================================================
    /// The item failed validation; nothing was attempted.
    #[error("Item failed validation: {}", .0.messages().join("; "))]
    ValidationFailed(ValidationReport),

    /// A re-sync targeted a module the item is not routed to.
    #[error("Item {item_id} is not routed to the {module} module")]
    ModuleNotInDestinations { item_id: String, module: Module },

    /// The item's fields now route it to different modules than its last
    /// sync; a single-module re-sync cannot reconcile that.
    #[error("Item {item_id} changed destination modules since its last sync; run a full sync")]
    DestinationsChanged { item_id: String },

    /// Another sync for the same item is still running.
    #[error("A sync for item {item_id} is already in progress")]
    SyncInFlight { item_id: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid engine configuration.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

/// Why one module did not take an item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleCommitError {
    /// The module's admission rules refused the item.
    #[error("{module} rejected the item: {reason}")]
    Rejected { module: Module, reason: String },

    /// The module could not be reached or is switched off.
    #[error("{module} is unavailable: {reason}")]
    Unavailable { module: Module, reason: String },

    /// No connector is registered for the module.
    #[error("No connector registered for the {0} module")]
    NotRegistered(Module),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if retrying the same call later can succeed without the
    /// user editing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::SyncInFlight { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }

    /// The validation report, when the attempt was blocked by validation.
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            SyncError::ValidationFailed(report) => Some(report),
            _ => None,
        }
    }
}

impl ModuleCommitError {
    pub fn module(&self) -> Module {
        match self {
            ModuleCommitError::Rejected { module, .. }
            | ModuleCommitError::Unavailable { module, .. } => *module,
            ModuleCommitError::NotRegistered(module) => *module,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equidesk_core::{validate_item_for_sync, BusinessType, InventoryItem, Money};

    #[test]
    fn test_retryable_errors() {
        assert!(SyncError::SyncInFlight { item_id: "a".into() }.is_retryable());
        assert!(!SyncError::InvalidConfig("bad".into()).is_retryable());
        assert!(!SyncError::DestinationsChanged { item_id: "a".into() }.is_retryable());
        assert!(!SyncError::ModuleNotInDestinations {
            item_id: "a".into(),
            module: Module::Store,
        }
        .is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(SyncError::ConfigLoadFailed("missing".into()).is_config_error());
        assert!(!SyncError::SyncInFlight { item_id: "a".into() }.is_config_error());
    }

    #[test]
    fn test_validation_failed_display() {
        let item = InventoryItem::new("", "feed", BusinessType::StableOwner, Money::from_cents(-1));
        let err = SyncError::ValidationFailed(validate_item_for_sync(&item));
        assert_eq!(
            err.to_string(),
            "Item failed validation: purchase price cannot be negative; product name is required"
        );
        assert_eq!(err.validation_report().unwrap().errors().len(), 2);
    }

    #[test]
    fn test_commit_error_display() {
        let err = ModuleCommitError::Rejected {
            module: Module::Marketplace,
            reason: "selling price is required".into(),
        };
        assert_eq!(err.to_string(), "marketplace rejected the item: selling price is required");
        assert_eq!(err.module(), Module::Marketplace);
        assert_eq!(
            ModuleCommitError::NotRegistered(Module::Store).to_string(),
            "No connector registered for the store module"
        );
    }
}

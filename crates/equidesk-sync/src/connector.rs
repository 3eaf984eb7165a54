//! # Module Connectors
//!
//! The commit endpoint for each module the orchestrator writes into.
//!
//! ## Connector Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ModuleConnector                                  │
//! │                                                                         │
//! │   SyncOrchestrator                                                     │
//! │        │ commit(&item)                                                  │
//! │        ▼                                                                │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐       │
//! │  │ inventory   │ │ pharmacy    │ │ store       │ │ marketplace │       │
//! │  │             │ │             │ │             │ │             │       │
//! │  │ accepts     │ │ needs       │ │ needs a     │ │ needs a     │       │
//! │  │ everything  │ │ pharmacy    │ │ positive    │ │ positive    │       │
//! │  │             │ │ settings    │ │ selling     │ │ price and   │       │
//! │  │             │ │             │ │ price       │ │ online      │       │
//! │  │             │ │             │ │             │ │ ordering    │       │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ └─────────────┘       │
//! │                                                                         │
//! │  Each commit upserts a JSON snapshot keyed by item id. A connector can │
//! │  be marked unavailable, after which every commit fails.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use equidesk_core::{InventoryItem, Module};

use crate::error::ModuleCommitError;

// =============================================================================
// Connector Trait
// =============================================================================

/// Something that can take an item into one module.
///
/// Implementations must be safe to call from several tasks at once.
pub trait ModuleConnector: Send + Sync {
    /// The module this connector writes into.
    fn module(&self) -> Module;

    /// Commits the item. Committing the same item twice overwrites the
    /// earlier copy.
    fn commit(&self, item: &InventoryItem) -> Result<(), ModuleCommitError>;
}

// =============================================================================
// Local Module View
// =============================================================================

/// What a module holds for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    pub snapshot: serde_json::Value,
    pub committed_at: DateTime<Utc>,
}

/// In-process view of one module, keyed by item id.
#[derive(Debug)]
pub struct LocalModuleView {
    module: Module,
    records: RwLock<HashMap<String, ModuleRecord>>,
    outage: RwLock<Option<String>>,
}

impl LocalModuleView {
    pub fn new(module: Module) -> Self {
        LocalModuleView {
            module,
            records: RwLock::new(HashMap::new()),
            outage: RwLock::new(None),
        }
    }

    /// Makes every following commit fail with `Unavailable`.
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(module = %self.module, reason = %reason, "Module marked unavailable");
        if let Ok(mut outage) = self.outage.write() {
            *outage = Some(reason);
        }
    }

    /// Clears a previous `set_unavailable`.
    pub fn set_available(&self) {
        if let Ok(mut outage) = self.outage.write() {
            *outage = None;
        }
    }

    /// The stored record for an item.
    pub fn get(&self, item_id: &str) -> Option<ModuleRecord> {
        self.records.read().ok()?.get(item_id).cloned()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.get(item_id).is_some()
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unavailable(&self, reason: impl Into<String>) -> ModuleCommitError {
        ModuleCommitError::Unavailable {
            module: self.module,
            reason: reason.into(),
        }
    }

    fn rejected(&self, reason: impl Into<String>) -> ModuleCommitError {
        ModuleCommitError::Rejected {
            module: self.module,
            reason: reason.into(),
        }
    }

    /// Module-specific admission rules.
    fn admit(&self, item: &InventoryItem) -> Result<(), ModuleCommitError> {
        match self.module {
            Module::Inventory => Ok(()),
            Module::Pharmacy => match &item.pharmacy_settings {
                Some(_) => Ok(()),
                None => Err(self.rejected("pharmacy settings are required")),
            },
            Module::Store => self.require_selling_price(item),
            Module::Marketplace => {
                self.require_selling_price(item)?;
                match &item.sales_configuration {
                    Some(config) if !config.available_for_online_orders => {
                        Err(self.rejected("item is not available for online orders"))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    fn require_selling_price(&self, item: &InventoryItem) -> Result<(), ModuleCommitError> {
        match item.selling_price {
            Some(price) if price.is_positive() => Ok(()),
            _ => Err(self.rejected("a positive selling price is required")),
        }
    }
}

impl ModuleConnector for LocalModuleView {
    fn module(&self) -> Module {
        self.module
    }

    fn commit(&self, item: &InventoryItem) -> Result<(), ModuleCommitError> {
        if let Some(reason) = self
            .outage
            .read()
            .map_err(|_| self.unavailable("outage flag lock poisoned"))?
            .clone()
        {
            return Err(self.unavailable(reason));
        }

        self.admit(item)?;

        let snapshot = serde_json::to_value(item)
            .map_err(|e| self.rejected(format!("item could not be serialized: {}", e)))?;

        let mut records = self
            .records
            .write()
            .map_err(|_| self.unavailable("record lock poisoned"))?;
        records.insert(
            item.id.clone(),
            ModuleRecord {
                snapshot,
                committed_at: Utc::now(),
            },
        );

        debug!(item_id = %item.id, module = %self.module, "Item committed");
        Ok(())
    }
}

//! # Sync Orchestrator
//!
//! Pushes one item into each of its destination modules.
//!
//! ## Attempt Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     sync_item_across_modules                            │
//! │                                                                         │
//! │  recompute_derived(markup_table)                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  validate_item_for_sync(item)                                          │
//! │        │                                                                │
//! │        ├── invalid ──► Err(ValidationFailed), nothing attempted         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  for module in destinations (inventory, pharmacy, store, marketplace)  │
//! │        │                                                                │
//! │        ├── connector.commit(item) ── Ok ──► succeeded(module)           │
//! │        │                           └ Err ──► failed(module, error)     │
//! │        │                                                                │
//! │        └── record_sync_result(item) (always, no early abort)          │
//! │                                                                         │
//! │  Result: one ModuleSyncResult per destination, in fixed order.         │
//! │  Nothing already committed is rolled back.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use equidesk_core::{
    validate_item_for_sync, InventoryItem, MarkupTable, Module, ModuleSyncResult,
};

use crate::connector::{LocalModuleView, ModuleConnector};
use crate::error::{ModuleCommitError, SyncError, SyncResult};

/// Routes items to registered module connectors.
///
/// Every entry point re-derives the item with `markup_table` first, so the
/// destination set and prices it acts on always match the user-set fields.
#[derive(Clone, Default)]
pub struct SyncOrchestrator {
    connectors: BTreeMap<Module, Arc<dyn ModuleConnector>>,
    markup_table: MarkupTable,
}

impl SyncOrchestrator {
    /// Creates an orchestrator with no connectors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an orchestrator with an in-process view for every module.
    pub fn with_local_views() -> Self {
        let mut orchestrator = Self::new();
        for module in Module::ALL {
            orchestrator.register(Arc::new(LocalModuleView::new(module)));
        }
        orchestrator
    }

    /// Uses `markup_table` for suggested prices.
    pub fn with_markup_table(mut self, markup_table: MarkupTable) -> Self {
        self.markup_table = markup_table;
        self
    }

    pub fn markup_table(&self) -> &MarkupTable {
        &self.markup_table
    }

    /// Registers a connector, replacing any earlier one for the same module.
    pub fn register(&mut self, connector: Arc<dyn ModuleConnector>) {
        let module = connector.module();
        if self.connectors.insert(module, connector).is_some() {
            debug!(module = %module, "Replaced module connector");
        }
    }

    /// The connector registered for a module.
    pub fn connector(&self, module: Module) -> Option<Arc<dyn ModuleConnector>> {
        self.connectors.get(&module).cloned()
    }

    // =========================================================================
    // Full Sync
    // =========================================================================

    /// Attempts every destination module in fixed order.
    ///
    /// Per-module failures are reported in the returned results and do not
    /// stop the remaining modules.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub fn sync_item_across_modules(
        &self,
        item: &mut InventoryItem,
    ) -> SyncResult<Vec<ModuleSyncResult>> {
        item.recompute_derived(&self.markup_table);
        ensure_valid(item)?;

        let modules = item.destination_modules().to_vec();
        let mut results = Vec::with_capacity(modules.len());

        for module in modules {
            let result = to_result(module, self.commit(module, item));
            item.record_sync_result(&result);
            results.push(result);
        }

        log_summary(&item.id, &results);
        Ok(results)
    }

    /// Same contract as [`Self::sync_item_across_modules`], with every module
    /// committed as its own task.
    ///
    /// Results come back in fixed module order no matter which task finishes
    /// first. A task that panics yields a failed result for its module.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn sync_item_concurrent(
        &self,
        item: &mut InventoryItem,
    ) -> SyncResult<Vec<ModuleSyncResult>> {
        item.recompute_derived(&self.markup_table);
        ensure_valid(item)?;

        let snapshot = Arc::new(item.clone());
        let handles: Vec<_> = item
            .destination_modules()
            .iter()
            .map(|module| {
                let connector = self.connector(module);
                let snapshot = Arc::clone(&snapshot);
                let handle = tokio::spawn(async move {
                    match connector {
                        Some(connector) => connector.commit(&snapshot),
                        None => Err(ModuleCommitError::NotRegistered(module)),
                    }
                });
                (module, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (module, handle) in handles {
            let result = match handle.await {
                Ok(outcome) => to_result(module, outcome),
                Err(join_err) => {
                    warn!(module = %module, error = %join_err, "Module task did not complete");
                    ModuleSyncResult::failed(module, format!("{} sync task failed: {}", module, join_err))
                }
            };
            item.record_sync_result(&result);
            results.push(result);
        }

        log_summary(&item.id, &results);
        Ok(results)
    }

    // =========================================================================
    // Single-Module Re-sync
    // =========================================================================

    /// Re-attempts one module, touching only that module's status.
    ///
    /// The item is re-derived before the commit so the module receives
    /// current prices. If that changes the destination set, nothing is
    /// committed or written: the item needs a full sync instead.
    #[instrument(skip(self, item), fields(item_id = %item.id, module = %module))]
    pub fn resync_module(
        &self,
        item: &mut InventoryItem,
        module: Module,
    ) -> SyncResult<ModuleSyncResult> {
        let mut refreshed = item.clone();
        refreshed.recompute_derived(&self.markup_table);

        if !refreshed.destination_modules().contains(module) {
            return Err(SyncError::ModuleNotInDestinations {
                item_id: item.id.clone(),
                module,
            });
        }
        if refreshed.destination_modules() != item.destination_modules() {
            return Err(SyncError::DestinationsChanged {
                item_id: item.id.clone(),
            });
        }
        ensure_valid(&refreshed)?;

        let result = to_result(module, self.commit(module, &refreshed));
        refreshed.record_sync_result(&result);
        *item = refreshed;

        info!(success = result.success, "Module re-sync finished");
        Ok(result)
    }

    fn commit(&self, module: Module, item: &InventoryItem) -> Result<(), ModuleCommitError> {
        match self.connectors.get(&module) {
            Some(connector) => connector.commit(item),
            None => Err(ModuleCommitError::NotRegistered(module)),
        }
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("modules", &self.connectors.keys().collect::<Vec<_>>())
            .field("markup_table", &self.markup_table)
            .finish()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn ensure_valid(item: &InventoryItem) -> SyncResult<()> {
    let report = validate_item_for_sync(item);
    if report.is_valid() {
        return Ok(());
    }
    warn!(item_id = %item.id, errors = ?report.messages(), "Item failed validation");
    Err(SyncError::ValidationFailed(report))
}

fn to_result(module: Module, outcome: Result<(), ModuleCommitError>) -> ModuleSyncResult {
    match outcome {
        Ok(()) => ModuleSyncResult::succeeded(module),
        Err(err) => {
            warn!(module = %module, error = %err, "Module commit failed");
            ModuleSyncResult::failed(module, err.to_string())
        }
    }
}

fn log_summary(item_id: &str, results: &[ModuleSyncResult]) {
    let failed = results.iter().filter(|r| !r.success).count();
    info!(
        item_id,
        attempted = results.len(),
        failed,
        "Item sync finished"
    );
}

//! # Sync Coordinator
//!
//! Front door for the inventory forms. Wraps the orchestrator with the
//! configured strategy and markup table, keeps one sync per item in flight,
//! and reports back to the UI.
//!
//! ## Coordinator Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SyncCoordinator                                  │
//! │                                                                         │
//! │  submit(item)                                                          │
//! │     │                                                                   │
//! │     ├── item id already in flight ──► Err(SyncInFlight)                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  InFlightGuard (released on drop, also on error)                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SyncOrchestrator ── Sequential | Concurrent                           │
//! │  (re-derives with config.pricing before validating)                    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  classify_outcome ──► SyncEventEmitter                                 │
//! │                        emit_result / emit_outcome /                    │
//! │                        emit_validation_failed                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info};

use equidesk_core::{
    classify_outcome, InventoryItem, Module, ModuleSyncResult, SyncOutcome, ValidationReport,
};

use crate::config::{EngineConfig, SyncStrategy};
use crate::error::{SyncError, SyncResult};
use crate::orchestrator::SyncOrchestrator;

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Trait for emitting sync events (implemented by the UI integration).
pub trait SyncEventEmitter: Send + Sync {
    /// Emits one module's result.
    fn emit_result(&self, item_id: &str, result: &ModuleSyncResult);

    /// Emits the overall outcome once every module has been attempted.
    fn emit_outcome(&self, item_id: &str, outcome: SyncOutcome);

    /// Emits the validation errors that blocked an attempt.
    fn emit_validation_failed(&self, item_id: &str, report: &ValidationReport);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl SyncEventEmitter for NoOpEmitter {
    fn emit_result(&self, _item_id: &str, _result: &ModuleSyncResult) {}
    fn emit_outcome(&self, _item_id: &str, _outcome: SyncOutcome) {}
    fn emit_validation_failed(&self, _item_id: &str, _report: &ValidationReport) {}
}

// =============================================================================
// Sync Report
// =============================================================================

/// What one submit produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub item_id: String,
    pub outcome: SyncOutcome,
    pub results: Vec<ModuleSyncResult>,
}

impl SyncReport {
    fn new(item_id: &str, results: Vec<ModuleSyncResult>) -> Self {
        SyncReport {
            item_id: item_id.to_string(),
            outcome: classify_outcome(&results),
            results,
        }
    }

    /// Modules that did not take the item.
    pub fn failed_modules(&self) -> Vec<Module> {
        equidesk_core::outcome::failed_modules(&self.results)
    }
}

// =============================================================================
// In-flight Guard
// =============================================================================

/// Marks an item id as busy until dropped.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    item_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock_in_flight(self.in_flight).remove(&self.item_id);
    }
}

/// Locks the in-flight set. The set stays consistent even if a holder
/// panicked, so a poisoned lock is recovered.
fn lock_in_flight(in_flight: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Sync Coordinator
// =============================================================================

/// Runs syncs for the inventory forms.
pub struct SyncCoordinator {
    orchestrator: SyncOrchestrator,
    config: Arc<EngineConfig>,
    in_flight: Mutex<HashSet<String>>,
    emitter: Arc<dyn SyncEventEmitter>,
}

impl SyncCoordinator {
    /// Creates a new coordinator.
    pub fn new(orchestrator: SyncOrchestrator, config: EngineConfig) -> Self {
        Self::with_emitter(orchestrator, config, Arc::new(NoOpEmitter))
    }

    /// Creates a new coordinator with a custom event emitter.
    ///
    /// The orchestrator is switched to the configured markup table.
    pub fn with_emitter(
        orchestrator: SyncOrchestrator,
        config: EngineConfig,
        emitter: Arc<dyn SyncEventEmitter>,
    ) -> Self {
        SyncCoordinator {
            orchestrator: orchestrator.with_markup_table(config.pricing.clone()),
            config: Arc::new(config),
            in_flight: Mutex::new(HashSet::new()),
            emitter,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator {
        &self.orchestrator
    }

    /// Returns true while a sync for the item is running.
    pub fn is_in_flight(&self, item_id: &str) -> bool {
        lock_in_flight(&self.in_flight).contains(item_id)
    }

    /// Syncs an item into all of its destination modules.
    pub async fn sync(&self, item: &mut InventoryItem) -> SyncResult<SyncReport> {
        let _guard = self.try_acquire(&item.id)?;

        let strategy = self.config.strategy();
        debug!(item_id = %item.id, %strategy, "Starting item sync");

        let attempt = match strategy {
            SyncStrategy::Sequential => self.orchestrator.sync_item_across_modules(item),
            SyncStrategy::Concurrent => self.orchestrator.sync_item_concurrent(item).await,
        };

        let report = SyncReport::new(&item.id, self.observe(&item.id, attempt)?);
        self.emitter.emit_outcome(&report.item_id, report.outcome);

        info!(
            item_id = %report.item_id,
            outcome = ?report.outcome,
            "Sync complete"
        );
        Ok(report)
    }

    /// Retries one module of an item.
    ///
    /// Other module statuses are left alone.
    pub async fn resync(&self, item: &mut InventoryItem, module: Module) -> SyncResult<SyncReport> {
        let _guard = self.try_acquire(&item.id)?;

        let attempt = self
            .orchestrator
            .resync_module(item, module)
            .map(|result| vec![result]);

        let report = SyncReport::new(&item.id, self.observe(&item.id, attempt)?);
        self.emitter.emit_outcome(&report.item_id, report.outcome);
        Ok(report)
    }

    /// Emits per-module results or the validation report for an attempt.
    fn observe(
        &self,
        item_id: &str,
        attempt: SyncResult<Vec<ModuleSyncResult>>,
    ) -> SyncResult<Vec<ModuleSyncResult>> {
        match attempt {
            Ok(results) => {
                for result in &results {
                    self.emitter.emit_result(item_id, result);
                }
                Ok(results)
            }
            Err(err) => {
                if let Some(report) = err.validation_report() {
                    self.emitter.emit_validation_failed(item_id, report);
                }
                Err(err)
            }
        }
    }

    fn try_acquire(&self, item_id: &str) -> SyncResult<InFlightGuard<'_>> {
        let mut in_flight = lock_in_flight(&self.in_flight);
        if !in_flight.insert(item_id.to_string()) {
            debug!(item_id, "Sync already in flight");
            return Err(SyncError::SyncInFlight {
                item_id: item_id.to_string(),
            });
        }

        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            item_id: item_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncSettings;
    use equidesk_core::{BusinessType, Money, PharmacySettings, UsageIntent};

    #[derive(Default)]
    struct RecordingEmitter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingEmitter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SyncEventEmitter for RecordingEmitter {
        fn emit_result(&self, _item_id: &str, result: &ModuleSyncResult) {
            self.events
                .lock()
                .unwrap()
                .push(format!("result:{}:{}", result.module, result.success));
        }

        fn emit_outcome(&self, _item_id: &str, outcome: SyncOutcome) {
            self.events.lock().unwrap().push(format!("outcome:{:?}", outcome));
        }

        fn emit_validation_failed(&self, _item_id: &str, report: &ValidationReport) {
            self.events
                .lock()
                .unwrap()
                .push(format!("invalid:{}", report.errors().len()));
        }
    }

    fn wormer() -> InventoryItem {
        InventoryItem::new(
            "Ivermectin paste",
            "dewormer",
            BusinessType::MixedBusiness,
            Money::from_cents(900),
        )
        .with_listing(true, UsageIntent::Both)
        .with_pharmacy_settings(PharmacySettings {
            dosage_form: "paste".into(),
            strength: "1.87%".into(),
            ..Default::default()
        })
    }

    fn concurrent_config() -> EngineConfig {
        EngineConfig {
            sync: SyncSettings {
                strategy: SyncStrategy::Concurrent,
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_partial_success_events() {
        let emitter = Arc::new(RecordingEmitter::default());
        let coordinator = SyncCoordinator::with_emitter(
            SyncOrchestrator::with_local_views(),
            EngineConfig::default(),
            emitter.clone(),
        );
        let mut item = wormer();

        let report = coordinator.sync(&mut item).await.unwrap();

        assert_eq!(report.outcome, SyncOutcome::PartialSuccess);
        assert_eq!(report.failed_modules(), vec![Module::Store, Module::Marketplace]);
        assert_eq!(
            emitter.events(),
            vec![
                "result:inventory:true",
                "result:pharmacy:true",
                "result:store:false",
                "result:marketplace:false",
                "outcome:PartialSuccess",
            ]
        );
        assert!(!coordinator.is_in_flight(&item.id));
    }

    #[tokio::test]
    async fn test_concurrent_strategy_full_success() {
        let coordinator =
            SyncCoordinator::new(SyncOrchestrator::with_local_views(), concurrent_config());
        let mut item = wormer().with_selling_price(Money::from_cents(1400));

        let report = coordinator.sync(&mut item).await.unwrap();

        assert_eq!(report.outcome, SyncOutcome::FullSuccess);
        assert_eq!(report.results.len(), 4);
    }

    #[tokio::test]
    async fn test_sync_uses_configured_markup() {
        let mut config = EngineConfig::default();
        config.pricing.stable_owner_bps = 2000;
        config.pricing.feed_adjustment_bps = 0;
        let coordinator = SyncCoordinator::new(SyncOrchestrator::with_local_views(), config);
        let mut item =
            InventoryItem::new("Timothy hay", "feed", BusinessType::StableOwner, Money::from_cents(1000));

        coordinator.sync(&mut item).await.unwrap();

        assert_eq!(item.suggested_markup(), Money::from_cents(1200));
    }

    #[tokio::test]
    async fn test_validation_failure_is_emitted() {
        let emitter = Arc::new(RecordingEmitter::default());
        let coordinator = SyncCoordinator::with_emitter(
            SyncOrchestrator::with_local_views(),
            EngineConfig::default(),
            emitter.clone(),
        );
        let mut item = InventoryItem::new("", "feed", BusinessType::StableOwner, Money::from_cents(100));

        let err = coordinator.sync(&mut item).await.unwrap_err();

        assert!(matches!(err, SyncError::ValidationFailed(_)));
        assert_eq!(emitter.events(), vec!["invalid:1"]);
        assert!(!coordinator.is_in_flight(&item.id));
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight() {
        let coordinator =
            SyncCoordinator::new(SyncOrchestrator::with_local_views(), EngineConfig::default());
        let mut item = wormer();

        let guard = coordinator.try_acquire(&item.id).unwrap();
        let err = coordinator.sync(&mut item).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(item.sync_status().is_empty());

        drop(guard);
        assert!(coordinator.sync(&mut item).await.is_ok());
    }

    #[tokio::test]
    async fn test_resync_reports_single_module() {
        let coordinator =
            SyncCoordinator::new(SyncOrchestrator::with_local_views(), EngineConfig::default());
        let mut item = wormer();
        coordinator.sync(&mut item).await.unwrap();

        item.selling_price = Some(Money::from_cents(1400));
        let report = coordinator.resync(&mut item, Module::Store).await.unwrap();

        assert_eq!(report.outcome, SyncOutcome::FullSuccess);
        assert_eq!(report.results, vec![ModuleSyncResult::succeeded(Module::Store)]);
        assert_eq!(item.module_status(Module::Marketplace), Some(false));
        assert_eq!(item.profit_margin(), 56);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_recovered() {
        let coordinator =
            SyncCoordinator::new(SyncOrchestrator::with_local_views(), EngineConfig::default());

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = coordinator.in_flight.lock().unwrap();
            panic!("holder crashed");
        }));
        assert!(poisoned.is_err());
        assert!(coordinator.in_flight.is_poisoned());

        let mut item = wormer();
        assert!(!coordinator.is_in_flight(&item.id));
        assert!(coordinator.sync(&mut item).await.is_ok());
        assert!(!coordinator.is_in_flight(&item.id));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = SyncReport::new("item-1", vec![ModuleSyncResult::succeeded(Module::Inventory)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["itemId"], "item-1");
        assert_eq!(json["outcome"], "full_success");
    }
}

//! # Sync Outcome
//!
//! Three-way classification of a finished sync attempt, for the toast and
//! badge the UI shows afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Module, ModuleSyncResult};

/// How a sync attempt went overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Every module succeeded.
    FullSuccess,
    /// Some modules succeeded, some failed.
    PartialSuccess,
    /// Every module failed.
    TotalFailure,
}

/// Classifies a set of per-module results.
///
/// An empty slice counts as full success: nothing was attempted, so nothing
/// failed.
///
/// ## Example
/// ```rust
/// use equidesk_core::outcome::{classify_outcome, SyncOutcome};
/// use equidesk_core::types::{Module, ModuleSyncResult};
///
/// let results = vec![
///     ModuleSyncResult::succeeded(Module::Inventory),
///     ModuleSyncResult::failed(Module::Store, "store offline"),
/// ];
/// assert_eq!(classify_outcome(&results), SyncOutcome::PartialSuccess);
/// ```
pub fn classify_outcome(results: &[ModuleSyncResult]) -> SyncOutcome {
    let succeeded = results.iter().filter(|r| r.success).count();

    if succeeded == results.len() {
        SyncOutcome::FullSuccess
    } else if succeeded == 0 {
        SyncOutcome::TotalFailure
    } else {
        SyncOutcome::PartialSuccess
    }
}

/// Modules whose result was a failure, in result order.
pub fn failed_modules(results: &[ModuleSyncResult]) -> Vec<Module> {
    results
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.module)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_success() {
        let results = vec![
            ModuleSyncResult::succeeded(Module::Inventory),
            ModuleSyncResult::succeeded(Module::Pharmacy),
        ];
        assert_eq!(classify_outcome(&results), SyncOutcome::FullSuccess);
        assert!(failed_modules(&results).is_empty());
    }

    #[test]
    fn test_total_failure() {
        let results = vec![
            ModuleSyncResult::failed(Module::Inventory, "down"),
            ModuleSyncResult::failed(Module::Store, "down"),
        ];
        assert_eq!(classify_outcome(&results), SyncOutcome::TotalFailure);
        assert_eq!(failed_modules(&results), vec![Module::Inventory, Module::Store]);
    }

    #[test]
    fn test_partial_success() {
        let results = vec![
            ModuleSyncResult::succeeded(Module::Inventory),
            ModuleSyncResult::failed(Module::Marketplace, "listing rejected"),
        ];
        assert_eq!(classify_outcome(&results), SyncOutcome::PartialSuccess);
        assert_eq!(failed_modules(&results), vec![Module::Marketplace]);
    }

    #[test]
    fn test_empty_is_full_success() {
        assert_eq!(classify_outcome(&[]), SyncOutcome::FullSuccess);
    }
}

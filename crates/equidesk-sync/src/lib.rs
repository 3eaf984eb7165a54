//! # equidesk-sync: Multi-Module Sync Engine for Equidesk
//!
//! This crate takes a validated inventory item and commits it into every
//! module it belongs to: inventory, pharmacy, store and marketplace.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Equidesk Sync Engine                             │
//! │                                                                         │
//! │   Inventory form submit                                                │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌──────────────────┐   events   ┌──────────────────────────────┐      │
//! │  │ SyncCoordinator  │──────────► │ SyncEventEmitter (UI toast,  │      │
//! │  │ one sync per item│            │ per-module badges)           │      │
//! │  └────────┬─────────┘            └──────────────────────────────┘      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌──────────────────┐                                                  │
//! │  │ SyncOrchestrator │  validate ─► attempt each destination module     │
//! │  └────────┬─────────┘                                                  │
//! │           │                                                             │
//! │     ┌─────┴──────┬─────────────┬──────────────┐                        │
//! │     ▼            ▼             ▼              ▼                         │
//! │  inventory    pharmacy       store       marketplace                   │
//! │  (ModuleConnector per module, LocalModuleView in process)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`coordinator`] - `SyncCoordinator`, in-flight guard and UI events
//! - [`orchestrator`] - `SyncOrchestrator`, full sync and single-module re-sync
//! - [`connector`] - `ModuleConnector` trait and `LocalModuleView`
//! - [`config`] - Engine configuration (markups, strategy, logging)
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Sync error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use equidesk_sync::{EngineConfig, SyncCoordinator, SyncOrchestrator};
//!
//! let config = EngineConfig::load_or_default(None);
//! equidesk_sync::telemetry::init_tracing(&config.logging);
//!
//! let coordinator = SyncCoordinator::new(SyncOrchestrator::with_local_views(), config);
//! let report = coordinator.sync(&mut item).await?;
//! println!("{:?}: {:?}", report.outcome, report.failed_modules());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod connector;
pub mod coordinator;
pub mod error;
pub mod orchestrator;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EngineConfig, LoggingSettings, SyncSettings, SyncStrategy};
pub use connector::{LocalModuleView, ModuleConnector, ModuleRecord};
pub use coordinator::{NoOpEmitter, SyncCoordinator, SyncEventEmitter, SyncReport};
pub use error::{ModuleCommitError, SyncError, SyncResult};
pub use orchestrator::SyncOrchestrator;

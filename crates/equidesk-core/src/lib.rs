//! # equidesk-core: Pure Reconciliation Logic for Equidesk
//!
//! This crate decides where an inventory item belongs and whether it is
//! ready to be synced. It contains only pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Equidesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Inventory Forms (UI)                          │   │
//! │  │    classification ──► business type ──► prices ──► submit       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ItemDraft / InventoryItem              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ equidesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌───────────┐ ┌───────────┐ ┌──────────────┐   │   │
//! │  │  │ classifier │ │   rules   │ │  pricing  │ │  validation  │   │   │
//! │  │  │ is_medical │ │ modules   │ │ markup    │ │ sync-ready?  │   │   │
//! │  │  └────────────┘ └───────────┘ └───────────┘ └──────────────┘   │   │
//! │  │  ┌────────────┐ ┌───────────┐ ┌───────────┐                    │   │
//! │  │  │  defaults  │ │   draft   │ │  outcome  │                    │   │
//! │  │  └────────────┘ └───────────┘ └───────────┘                    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              equidesk-sync (Orchestration Layer)                │   │
//! │  │        per-module commit, re-sync, config, logging              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, Module, ModuleSyncResult, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`classifier`] - Medical classification
//! - [`rules`] - Business rule table and destination resolver
//! - [`pricing`] - Suggested price and profit margin
//! - [`validation`] - Sync-readiness validation
//! - [`defaults`] - Smart defaults for the inventory form
//! - [`draft`] - Partial form input and conversion to an item
//! - [`outcome`] - Full / partial / total classification of sync results
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use equidesk_core::{BusinessType, InventoryItem, Module, Money, UsageIntent};
//!
//! let item = InventoryItem::new(
//!     "Procaine penicillin",
//!     "antibiotic",
//!     BusinessType::PharmacyOwner,
//!     Money::from_cents(1250),
//! )
//! .with_listing(true, UsageIntent::ForSale)
//! .with_selling_price(Money::from_cents(1875));
//!
//! assert!(item.is_medical_item());
//! assert_eq!(item.destination_modules().to_vec(), Module::ALL.to_vec());
//! assert_eq!(item.profit_margin(), 50);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classifier;
pub mod defaults;
pub mod draft;
pub mod error;
pub mod money;
pub mod outcome;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use defaults::{get_smart_defaults, SmartDefaults};
pub use draft::ItemDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use outcome::{classify_outcome, SyncOutcome};
pub use pricing::{calculate_suggested_markup, MarkupTable};
pub use rules::determine_destination_modules;
pub use types::*;
pub use validation::{validate_item_for_sync, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Highest markup percentage a sales configuration may carry.
pub const MAX_MARKUP_PERCENTAGE: u32 = 1000;

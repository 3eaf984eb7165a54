//! # Domain Types
//!
//! Core domain types used throughout Equidesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌──────────────────┐   ┌─────────────────┐  │
//! │  │   InventoryItem     │   │     Module       │   │  BusinessType   │  │
//! │  │  ─────────────────  │   │  ──────────────  │   │  ─────────────  │  │
//! │  │  id (UUID)          │   │  Inventory       │   │  StableOwner    │  │
//! │  │  product_name       │   │  Pharmacy        │   │  PharmacyOwner  │  │
//! │  │  classification     │   │  Store           │   │  MixedBusiness  │  │
//! │  │  prices (cents)     │   │  Marketplace     │   └─────────────────┘  │
//! │  │  ── derived ──      │   └──────────────────┘                        │
//! │  │  is_medical_item    │   ┌──────────────────┐   ┌─────────────────┐  │
//! │  │  destination_modules│   │ ModuleSyncResult │   │  UsageIntent    │  │
//! │  │  suggested_markup   │   │  ──────────────  │   │  ─────────────  │  │
//! │  │  profit_margin      │   │  module          │   │  PersonalUse    │  │
//! │  │  sync_status        │   │  success / error │   │  ForSale, Both  │  │
//! │  └─────────────────────┘   └──────────────────┘   └─────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Fields
//! The derived half of [`InventoryItem`] is private. It is written only by
//! [`InventoryItem::recompute_derived`] (classification, destinations,
//! pricing) and [`InventoryItem::record_sync_result`] (per-module status).

use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::classifier;
use crate::error::CoreError;
use crate::money::Money;
use crate::pricing::{self, MarkupTable};
use crate::rules;

// =============================================================================
// Module
// =============================================================================

/// A downstream business module an item can be synchronized into.
///
/// Declaration order is the fixed sync/render order: `Ord` follows it, so any
/// sorted collection of modules iterates inventory → pharmacy → store →
/// marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// System of record. Every item belongs here.
    Inventory,
    /// Dispensary view for medical items.
    Pharmacy,
    /// Own storefront / POS catalogue.
    Store,
    /// Shared marketplace listing.
    Marketplace,
}

impl Module {
    /// All modules in fixed order.
    pub const ALL: [Module; 4] = [
        Module::Inventory,
        Module::Pharmacy,
        Module::Store,
        Module::Marketplace,
    ];

    /// Returns the wire name of the module.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Module::Inventory => "inventory",
            Module::Pharmacy => "pharmacy",
            Module::Store => "store",
            Module::Marketplace => "marketplace",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Module {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inventory" => Ok(Module::Inventory),
            "pharmacy" => Ok(Module::Pharmacy),
            "store" => Ok(Module::Store),
            "marketplace" => Ok(Module::Marketplace),
            other => Err(CoreError::InvalidPayload(format!(
                "Unknown module: '{}'. Valid options: inventory, pharmacy, store, marketplace",
                other
            ))),
        }
    }
}

// =============================================================================
// Module Set
// =============================================================================

/// Ordered set of destination modules.
///
/// Iteration order is always [`Module::ALL`] order, whatever order modules
/// were inserted in. Serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleSet(BTreeSet<Module>);

impl ModuleSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        ModuleSet(BTreeSet::new())
    }

    /// Adds a module. Returns false if it was already present.
    pub fn insert(&mut self, module: Module) -> bool {
        self.0.insert(module)
    }

    pub fn contains(&self, module: Module) -> bool {
        self.0.contains(&module)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in fixed module order.
    pub fn iter(&self) -> impl Iterator<Item = Module> + '_ {
        self.0.iter().copied()
    }

    /// Returns the modules as a vector in fixed order.
    pub fn to_vec(&self) -> Vec<Module> {
        self.iter().collect()
    }
}

impl FromIterator<Module> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        ModuleSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ModuleSet {
    type Item = &'a Module;
    type IntoIter = btree_set::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Business Type & Usage Intent
// =============================================================================

/// The kind of business the tenant runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    /// Keeps horses; buys mostly for own use.
    StableOwner,
    /// Runs a veterinary pharmacy.
    PharmacyOwner,
    /// Both of the above.
    MixedBusiness,
}

impl BusinessType {
    pub const ALL: [BusinessType; 3] = [
        BusinessType::StableOwner,
        BusinessType::PharmacyOwner,
        BusinessType::MixedBusiness,
    ];
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessType::StableOwner => write!(f, "stable_owner"),
            BusinessType::PharmacyOwner => write!(f, "pharmacy_owner"),
            BusinessType::MixedBusiness => write!(f, "mixed_business"),
        }
    }
}

/// What the owner intends to do with the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UsageIntent {
    #[default]
    PersonalUse,
    ForSale,
    Both,
}

impl UsageIntent {
    pub const ALL: [UsageIntent; 3] = [
        UsageIntent::PersonalUse,
        UsageIntent::ForSale,
        UsageIntent::Both,
    ];

    /// Returns true if some of the stock is meant to be sold.
    pub const fn includes_sale(&self) -> bool {
        matches!(self, UsageIntent::ForSale | UsageIntent::Both)
    }
}

// =============================================================================
// Markup Rate
// =============================================================================

/// Markup represented in basis points (bps).
///
/// 4000 bps = 40%. Same representation as tax rates at the till, so markup
/// math stays in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct MarkupRate(u32);

impl MarkupRate {
    /// Creates a markup rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        MarkupRate(bps)
    }

    /// Creates a markup rate from a whole percentage (40 → 40%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        MarkupRate(pct * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a whole percentage, rounded half-up.
    #[inline]
    pub const fn whole_percent(&self) -> u32 {
        (self.0 + 50) / 100
    }

    #[inline]
    pub const fn zero() -> Self {
        MarkupRate(0)
    }

    /// Shifts the rate by a signed number of basis points, floored at zero.
    pub fn adjusted_by(&self, delta_bps: i32) -> Self {
        let shifted = self.0 as i64 + delta_bps as i64;
        MarkupRate(shifted.clamp(0, u32::MAX as i64) as u32)
    }
}

// =============================================================================
// Pharmacy & Sales Sub-records
// =============================================================================

/// Dispensing details required when an item is routed to the pharmacy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PharmacySettings {
    pub requires_prescription: bool,
    pub controlled_substance: bool,
    /// Tablet, paste, injectable, powder...
    pub dosage_form: String,
    /// e.g. "500mg", "10mg/mL".
    pub strength: String,
    #[serde(default)]
    pub active_ingredient: Option<String>,
    #[serde(default)]
    pub storage_requirements: Option<String>,
    /// Days before a treated horse may compete or enter the food chain.
    #[serde(default)]
    pub withdrawal_period_days: u32,
}

/// Retail settings used by the store and marketplace modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesConfiguration {
    /// Whole percent, 0-1000.
    pub markup_percentage: u32,
    /// At least 1.
    pub minimum_order_quantity: u32,
    pub requires_consultation: bool,
    pub available_for_online_orders: bool,
}

impl Default for SalesConfiguration {
    fn default() -> Self {
        SalesConfiguration {
            markup_percentage: 0,
            minimum_order_quantity: 1,
            requires_consultation: false,
            available_for_online_orders: true,
        }
    }
}

// =============================================================================
// Module Sync Result
// =============================================================================

/// Outcome of committing one item to one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSyncResult {
    pub module: Module,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModuleSyncResult {
    pub fn succeeded(module: Module) -> Self {
        ModuleSyncResult {
            module,
            success: true,
            error: None,
        }
    }

    pub fn failed(module: Module, error: impl Into<String>) -> Self {
        ModuleSyncResult {
            module,
            success: false,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// The unit of work: one stock item and where it lives.
///
/// Derived fields are serialized for the UI but never read back: decoding an
/// item recomputes them from the user-set fields.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub product_name: String,

    /// Free text entered or picked by the user ("Veterinary antibiotic", "Hay").
    pub classification: String,

    pub business_type: BusinessType,

    pub usage_intent: UsageIntent,

    pub list_for_sale: bool,

    /// Purchase price in cents.
    pub purchase_price: Money,

    /// Selling price in cents, if the owner set one.
    pub selling_price: Option<Money>,

    pub requires_special_handling: bool,

    pub pharmacy_settings: Option<PharmacySettings>,

    pub sales_configuration: Option<SalesConfiguration>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    // ── derived ──────────────────────────────────────────────────────────
    is_medical_item: bool,

    #[ts(as = "Vec<Module>")]
    destination_modules: ModuleSet,

    suggested_markup: Money,

    profit_margin: i64,

    sync_status: BTreeMap<Module, bool>,
}

/// The user-set half of an item, as it arrives from the UI.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: String,
    product_name: String,
    classification: String,
    business_type: BusinessType,
    #[serde(default)]
    usage_intent: UsageIntent,
    #[serde(default)]
    list_for_sale: bool,
    purchase_price: Money,
    #[serde(default)]
    selling_price: Option<Money>,
    #[serde(default)]
    requires_special_handling: bool,
    #[serde(default)]
    pharmacy_settings: Option<PharmacySettings>,
    #[serde(default)]
    sales_configuration: Option<SalesConfiguration>,
    created_at: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for InventoryItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = ItemRecord::deserialize(deserializer)?;
        let mut item = InventoryItem {
            id: record.id,
            product_name: record.product_name,
            classification: record.classification,
            business_type: record.business_type,
            usage_intent: record.usage_intent,
            list_for_sale: record.list_for_sale,
            purchase_price: record.purchase_price,
            selling_price: record.selling_price,
            requires_special_handling: record.requires_special_handling,
            pharmacy_settings: record.pharmacy_settings,
            sales_configuration: record.sales_configuration,
            created_at: record.created_at,
            is_medical_item: false,
            destination_modules: ModuleSet::new(),
            suggested_markup: Money::zero(),
            profit_margin: 0,
            sync_status: BTreeMap::new(),
        };
        item.recompute_derived(&MarkupTable::default());
        Ok(item)
    }
}

impl InventoryItem {
    /// Creates an item for personal use, not listed, with derived fields
    /// computed from the default markup table.
    pub fn new(
        product_name: impl Into<String>,
        classification: impl Into<String>,
        business_type: BusinessType,
        purchase_price: Money,
    ) -> Self {
        let mut item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            product_name: product_name.into(),
            classification: classification.into(),
            business_type,
            usage_intent: UsageIntent::default(),
            list_for_sale: false,
            purchase_price,
            selling_price: None,
            requires_special_handling: false,
            pharmacy_settings: None,
            sales_configuration: None,
            created_at: Utc::now(),
            is_medical_item: false,
            destination_modules: ModuleSet::new(),
            suggested_markup: Money::zero(),
            profit_margin: 0,
            sync_status: BTreeMap::new(),
        };
        item.recompute_derived(&MarkupTable::default());
        item
    }

    /// Sets listing flag and usage intent, then re-derives.
    pub fn with_listing(mut self, list_for_sale: bool, usage_intent: UsageIntent) -> Self {
        self.set_listing(list_for_sale, usage_intent);
        self
    }

    /// Sets the selling price, then re-derives.
    pub fn with_selling_price(mut self, price: Money) -> Self {
        self.set_selling_price(Some(price));
        self
    }

    pub fn with_pharmacy_settings(mut self, settings: PharmacySettings) -> Self {
        self.pharmacy_settings = Some(settings);
        self
    }

    pub fn with_sales_configuration(mut self, config: SalesConfiguration) -> Self {
        self.sales_configuration = Some(config);
        self
    }

    // =========================================================================
    // Setters
    // =========================================================================
    // Each re-derives with the default table; the orchestrator re-derives
    // again with its configured table before any commit.

    pub fn set_classification(&mut self, classification: impl Into<String>) {
        self.classification = classification.into();
        self.recompute_derived(&MarkupTable::default());
    }

    pub fn set_business_type(&mut self, business_type: BusinessType) {
        self.business_type = business_type;
        self.recompute_derived(&MarkupTable::default());
    }

    pub fn set_listing(&mut self, list_for_sale: bool, usage_intent: UsageIntent) {
        self.list_for_sale = list_for_sale;
        self.usage_intent = usage_intent;
        self.recompute_derived(&MarkupTable::default());
    }

    pub fn set_purchase_price(&mut self, price: Money) {
        self.purchase_price = price;
        self.recompute_derived(&MarkupTable::default());
    }

    pub fn set_selling_price(&mut self, price: Option<Money>) {
        self.selling_price = price;
        self.recompute_derived(&MarkupTable::default());
    }

    /// Recomputes every derived field from the user-set fields.
    ///
    /// Call after any change to classification, business type, usage
    /// intent, listing flag or prices. Status entries for modules that
    /// dropped out of the destination set are removed.
    pub fn recompute_derived(&mut self, markup_table: &MarkupTable) {
        self.is_medical_item = classifier::is_medical_item(&self.classification);
        self.destination_modules = rules::determine_destination_modules(
            self.business_type,
            &self.classification,
            self.list_for_sale,
            self.usage_intent,
            self.is_medical_item,
        );
        self.suggested_markup = markup_table.suggested_price(
            self.purchase_price,
            &self.classification,
            self.business_type,
        );
        self.profit_margin = pricing::profit_margin(self.purchase_price, self.selling_price);

        let destinations = &self.destination_modules;
        self.sync_status.retain(|module, _| destinations.contains(*module));
    }

    /// Writes one module's sync outcome into `sync_status`.
    ///
    /// Returns false, and writes nothing, when the module is not a
    /// destination of this item.
    pub fn record_sync_result(&mut self, result: &ModuleSyncResult) -> bool {
        if !self.destination_modules.contains(result.module) {
            return false;
        }
        self.sync_status.insert(result.module, result.success);
        true
    }

    // =========================================================================
    // Derived Field Accessors
    // =========================================================================

    #[inline]
    pub fn is_medical_item(&self) -> bool {
        self.is_medical_item
    }

    #[inline]
    pub fn destination_modules(&self) -> &ModuleSet {
        &self.destination_modules
    }

    /// Suggested selling price from the markup table.
    #[inline]
    pub fn suggested_markup(&self) -> Money {
        self.suggested_markup
    }

    /// Margin of the entered selling price over purchase price, in percent.
    #[inline]
    pub fn profit_margin(&self) -> i64 {
        self.profit_margin
    }

    #[inline]
    pub fn sync_status(&self) -> &BTreeMap<Module, bool> {
        &self.sync_status
    }

    /// Last recorded status for a module, if it was ever synced.
    pub fn module_status(&self, module: Module) -> Option<bool> {
        self.sync_status.get(&module).copied()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

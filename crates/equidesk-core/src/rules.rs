//! # Business Rules
//!
//! The static rule table and the destination resolver built on it.
//!
//! ## Destination Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Which modules does an item belong to?                 │
//! │                                                                         │
//! │  inventory   ── always (system of record)                               │
//! │                                                                         │
//! │  pharmacy    ── is_medical                                              │
//! │                                                                         │
//! │  store       ── list_for_sale AND                                       │
//! │                 (business sells retail OR usage intent includes sale)   │
//! │                                                                         │
//! │  marketplace ── store AND business lists on the marketplace             │
//! │                                                                         │
//! │  Output order: inventory, pharmacy, store, marketplace                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule is an exhaustive `match` on the closed enums, so adding a new
//! business type fails to compile until every rule has an answer for it.

use crate::types::{BusinessType, MarkupRate, Module, ModuleSet, UsageIntent};

// =============================================================================
// Business Rule
// =============================================================================

/// Static per-business-type rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessRule {
    /// Listed items go to the store even when the usage intent is personal.
    pub retail_channel: bool,
    /// Store items are also published on the marketplace.
    pub marketplace_channel: bool,
    /// Base markup before classification adjustments.
    pub base_markup: MarkupRate,
    /// Usage intent suggested for a new item.
    pub default_usage_intent: UsageIntent,
    /// Whether a new item is suggested as listed for sale.
    pub lists_by_default: bool,
    /// Whether suggested pharmacy settings require a prescription.
    pub prescription_by_default: bool,
}

/// Returns the rule for a business type.
pub const fn rule_for(business_type: BusinessType) -> BusinessRule {
    match business_type {
        BusinessType::StableOwner => BusinessRule {
            retail_channel: false,
            marketplace_channel: false,
            base_markup: MarkupRate::from_percent(15),
            default_usage_intent: UsageIntent::PersonalUse,
            lists_by_default: false,
            prescription_by_default: false,
        },
        BusinessType::PharmacyOwner => BusinessRule {
            retail_channel: true,
            marketplace_channel: true,
            base_markup: MarkupRate::from_percent(40),
            default_usage_intent: UsageIntent::ForSale,
            lists_by_default: true,
            prescription_by_default: true,
        },
        BusinessType::MixedBusiness => BusinessRule {
            retail_channel: true,
            marketplace_channel: true,
            base_markup: MarkupRate::from_percent(30),
            default_usage_intent: UsageIntent::Both,
            lists_by_default: true,
            prescription_by_default: true,
        },
    }
}

// =============================================================================
// Rule Key
// =============================================================================

/// The inputs every destination rule is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub business_type: BusinessType,
    pub usage_intent: UsageIntent,
    pub list_for_sale: bool,
    pub is_medical: bool,
}

impl RuleKey {
    /// Returns true if the key routes to `module`.
    pub fn routes_to(&self, module: Module) -> bool {
        let rule = rule_for(self.business_type);
        match module {
            Module::Inventory => true,
            Module::Pharmacy => self.is_medical,
            Module::Store => {
                self.list_for_sale && (rule.retail_channel || self.usage_intent.includes_sale())
            }
            Module::Marketplace => self.routes_to(Module::Store) && rule.marketplace_channel,
        }
    }

    /// Resolves the full destination set in fixed module order.
    pub fn destinations(&self) -> ModuleSet {
        Module::ALL
            .into_iter()
            .filter(|module| self.routes_to(*module))
            .collect()
    }
}

// =============================================================================
// Destination Resolver
// =============================================================================

/// Computes the modules an item belongs to.
///
/// `classification` is accepted so every caller passes the same inputs the
/// UI form has; the medical decision is taken from `is_medical`, which the
/// caller derives with [`crate::classifier::is_medical_item`].
///
/// ## Example
/// ```rust
/// use equidesk_core::rules::determine_destination_modules;
/// use equidesk_core::types::{BusinessType, Module, UsageIntent};
///
/// let modules = determine_destination_modules(
///     BusinessType::PharmacyOwner,
///     "antibiotic",
///     true,
///     UsageIntent::ForSale,
///     true,
/// );
/// assert_eq!(
///     modules.to_vec(),
///     vec![Module::Inventory, Module::Pharmacy, Module::Store, Module::Marketplace]
/// );
/// ```
pub fn determine_destination_modules(
    business_type: BusinessType,
    _classification: &str,
    list_for_sale: bool,
    usage_intent: UsageIntent,
    is_medical: bool,
) -> ModuleSet {
    RuleKey {
        business_type,
        usage_intent,
        list_for_sale,
        is_medical,
    }
    .destinations()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Every combination of the four rule inputs.
    fn all_keys() -> Vec<RuleKey> {
        let mut keys = Vec::new();
        for business_type in BusinessType::ALL {
            for usage_intent in UsageIntent::ALL {
                for list_for_sale in [false, true] {
                    for is_medical in [false, true] {
                        keys.push(RuleKey {
                            business_type,
                            usage_intent,
                            list_for_sale,
                            is_medical,
                        });
                    }
                }
            }
        }
        keys
    }

    #[test]
    fn test_inventory_always_present() {
        for key in all_keys() {
            assert!(key.destinations().contains(Module::Inventory), "{key:?}");
        }
    }

    #[test]
    fn test_pharmacy_iff_medical() {
        for key in all_keys() {
            assert_eq!(key.destinations().contains(Module::Pharmacy), key.is_medical, "{key:?}");
        }
    }

    #[test]
    fn test_stable_owner_never_on_marketplace() {
        for key in all_keys()
            .into_iter()
            .filter(|k| k.business_type == BusinessType::StableOwner)
        {
            assert!(!key.destinations().contains(Module::Marketplace), "{key:?}");
        }
    }

    #[test]
    fn test_marketplace_implies_store() {
        for key in all_keys() {
            let modules = key.destinations();
            if modules.contains(Module::Marketplace) {
                assert!(modules.contains(Module::Store), "{key:?}");
            }
        }
    }

    #[test]
    fn test_unlisted_items_stay_off_the_shelf() {
        for key in all_keys().into_iter().filter(|k| !k.list_for_sale) {
            let modules = key.destinations();
            assert!(!modules.contains(Module::Store), "{key:?}");
            assert!(!modules.contains(Module::Marketplace), "{key:?}");
        }
    }

    #[test]
    fn test_output_order_is_fixed() {
        for key in all_keys() {
            let modules = key.destinations().to_vec();
            let mut sorted = modules.clone();
            sorted.sort();
            assert_eq!(modules, sorted, "{key:?}");
        }
    }

    #[test]
    fn test_stable_owner_selling_reaches_store_only() {
        let modules = determine_destination_modules(
            BusinessType::StableOwner,
            "tack",
            true,
            UsageIntent::ForSale,
            false,
        );
        assert_eq!(modules.to_vec(), vec![Module::Inventory, Module::Store]);
    }

    #[test]
    fn test_stable_owner_personal_listing_ignored() {
        let modules = determine_destination_modules(
            BusinessType::StableOwner,
            "tack",
            true,
            UsageIntent::PersonalUse,
            false,
        );
        assert_eq!(modules.to_vec(), vec![Module::Inventory]);
    }

    #[test]
    fn test_mixed_business_listing_reaches_marketplace() {
        let modules = determine_destination_modules(
            BusinessType::MixedBusiness,
            "hay",
            true,
            UsageIntent::PersonalUse,
            false,
        );
        assert_eq!(
            modules.to_vec(),
            vec![Module::Inventory, Module::Store, Module::Marketplace]
        );
    }

    #[test]
    fn test_feed_for_stable_owner() {
        let modules = determine_destination_modules(
            BusinessType::StableOwner,
            "feed",
            false,
            UsageIntent::PersonalUse,
            false,
        );
        assert_eq!(modules.to_vec(), vec![Module::Inventory]);
    }

    #[test]
    fn test_rule_markups() {
        assert_eq!(rule_for(BusinessType::PharmacyOwner).base_markup.bps(), 4000);
        assert_eq!(rule_for(BusinessType::MixedBusiness).base_markup.bps(), 3000);
        assert_eq!(rule_for(BusinessType::StableOwner).base_markup.bps(), 1500);
    }
}

//! # Smart Defaults
//!
//! Suggested values for a new or edited item, recomputed when the user
//! changes the classification or business type.
//!
//! The engine is stateless and only suggests. Applying a suggestion only
//! to fields the user has not set is the caller's job; [`ItemDraft`] does
//! exactly that for the inventory form.
//!
//! [`ItemDraft`]: crate::draft::ItemDraft

use serde::Serialize;

use crate::classifier;
use crate::rules::{self, rule_for};
use crate::types::{BusinessType, ModuleSet, PharmacySettings, SalesConfiguration, UsageIntent};

/// Suggested field values for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartDefaults {
    pub list_for_sale: bool,
    pub usage_intent: UsageIntent,
    /// Destinations the other suggestions would produce.
    pub destination_modules: ModuleSet,
    /// Only suggested for medical classifications.
    pub pharmacy_settings: Option<PharmacySettings>,
    /// Only suggested when the item is suggested as listed.
    pub sales_configuration: Option<SalesConfiguration>,
}

/// Computes smart defaults for a business type and classification.
///
/// ## Example
/// ```rust
/// use equidesk_core::defaults::get_smart_defaults;
/// use equidesk_core::types::{BusinessType, Module, UsageIntent};
///
/// let defaults = get_smart_defaults(BusinessType::PharmacyOwner, "Veterinary antibiotic");
/// assert!(defaults.list_for_sale);
/// assert_eq!(defaults.usage_intent, UsageIntent::ForSale);
/// assert!(defaults.destination_modules.contains(Module::Pharmacy));
/// assert!(defaults.pharmacy_settings.unwrap().requires_prescription);
/// ```
pub fn get_smart_defaults(business_type: BusinessType, classification: &str) -> SmartDefaults {
    let rule = rule_for(business_type);
    let is_medical = classifier::is_medical_item(classification);

    let list_for_sale = rule.lists_by_default;
    let usage_intent = rule.default_usage_intent;

    let pharmacy_settings = is_medical.then(|| PharmacySettings {
        requires_prescription: rule.prescription_by_default,
        ..PharmacySettings::default()
    });

    let sales_configuration = list_for_sale.then(|| SalesConfiguration {
        markup_percentage: rule.base_markup.whole_percent(),
        minimum_order_quantity: 1,
        requires_consultation: is_medical,
        available_for_online_orders: !is_medical || !rule.prescription_by_default,
    });

    SmartDefaults {
        list_for_sale,
        usage_intent,
        destination_modules: rules::determine_destination_modules(
            business_type,
            classification,
            list_for_sale,
            usage_intent,
            is_medical,
        ),
        pharmacy_settings,
        sales_configuration,
    }
}

//! # Item Draft
//!
//! The partial record the inventory form submits. Every user field is
//! optional until the draft is turned into an [`InventoryItem`].
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form JSON ──► ItemDraft::from_json                                     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  classification / business type changed                                 │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  apply_smart_defaults  ── fills only fields that are still None        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  into_item(markup table) ── derived fields computed once, explicitly   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::SmartDefaults;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::MarkupTable;
use crate::types::{
    BusinessType, InventoryItem, PharmacySettings, SalesConfiguration, UsageIntent,
};

/// Raw inventory form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub business_type: Option<BusinessType>,
    #[serde(default)]
    pub usage_intent: Option<UsageIntent>,
    #[serde(default)]
    pub list_for_sale: Option<bool>,
    #[serde(default)]
    pub purchase_price: Option<Money>,
    #[serde(default)]
    pub selling_price: Option<Money>,
    #[serde(default)]
    pub requires_special_handling: Option<bool>,
    #[serde(default)]
    pub pharmacy_settings: Option<PharmacySettings>,
    #[serde(default)]
    pub sales_configuration: Option<SalesConfiguration>,
}

impl ItemDraft {
    /// Decodes a draft from the form's JSON payload.
    pub fn from_json(payload: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Fills fields the user has not set from the suggestions.
    ///
    /// Fields that are already `Some` are never touched, so a value the user
    /// typed survives any number of classification changes.
    pub fn apply_smart_defaults(&mut self, defaults: &SmartDefaults) {
        self.list_for_sale.get_or_insert(defaults.list_for_sale);
        self.usage_intent.get_or_insert(defaults.usage_intent);

        if self.pharmacy_settings.is_none() {
            self.pharmacy_settings = defaults.pharmacy_settings.clone();
        }
        if self.sales_configuration.is_none() {
            self.sales_configuration = defaults.sales_configuration.clone();
        }
    }

    /// Builds the item and computes its derived fields.
    ///
    /// Product name, business type and purchase price have no defaults and
    /// must be present. A missing id gets a fresh UUID.
    pub fn into_item(self, markup_table: &MarkupTable) -> CoreResult<InventoryItem> {
        let product_name = self.product_name.ok_or_else(|| incomplete("product name"))?;
        let business_type = self.business_type.ok_or_else(|| incomplete("business type"))?;
        let purchase_price = self.purchase_price.ok_or_else(|| incomplete("purchase price"))?;

        let mut item = InventoryItem::new(
            product_name,
            self.classification.unwrap_or_default(),
            business_type,
            purchase_price,
        );
        item.id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        item.usage_intent = self.usage_intent.unwrap_or_default();
        item.list_for_sale = self.list_for_sale.unwrap_or(false);
        item.selling_price = self.selling_price;
        item.requires_special_handling = self.requires_special_handling.unwrap_or(false);
        item.pharmacy_settings = self.pharmacy_settings;
        item.sales_configuration = self.sales_configuration;
        item.created_at = Utc::now();

        item.recompute_derived(markup_table);
        Ok(item)
    }
}

fn incomplete(field: &str) -> CoreError {
    CoreError::IncompleteDraft {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::get_smart_defaults;
    use crate::types::Module;

    #[test]
    fn test_from_form_json() {
        let draft = ItemDraft::from_json(
            r#"{
                "productName": "Procaine penicillin",
                "classification": "antibiotic",
                "businessType": "pharmacy_owner",
                "listForSale": true,
                "purchasePrice": 1250,
                "sellingPrice": 1875
            }"#,
        )
        .unwrap();
        assert_eq!(draft.business_type, Some(BusinessType::PharmacyOwner));
        assert_eq!(draft.usage_intent, None);

        let item = draft.into_item(&MarkupTable::default()).unwrap();
        assert!(item.is_medical_item());
        assert_eq!(item.destination_modules().to_vec(), Module::ALL.to_vec());
        assert_eq!(item.profit_margin(), 50);
    }

    #[test]
    fn test_bad_json_is_invalid_payload() {
        let err = ItemDraft::from_json(r#"{"businessType": "horse_whisperer"}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPayload(_)));
    }

    #[test]
    fn test_smart_defaults_never_override_user_fields() {
        let mut draft = ItemDraft {
            list_for_sale: Some(false),
            ..ItemDraft::default()
        };
        let defaults = get_smart_defaults(BusinessType::PharmacyOwner, "antibiotic");
        draft.apply_smart_defaults(&defaults);

        assert_eq!(draft.list_for_sale, Some(false));
        assert_eq!(draft.usage_intent, Some(UsageIntent::ForSale));
        assert!(draft.pharmacy_settings.is_some());
    }

    #[test]
    fn test_user_pharmacy_settings_survive_defaults() {
        let mine = PharmacySettings {
            dosage_form: "paste".to_string(),
            strength: "1g".to_string(),
            ..PharmacySettings::default()
        };
        let mut draft = ItemDraft {
            pharmacy_settings: Some(mine.clone()),
            ..ItemDraft::default()
        };
        draft.apply_smart_defaults(&get_smart_defaults(BusinessType::MixedBusiness, "vet"));
        assert_eq!(draft.pharmacy_settings, Some(mine));
    }

    #[test]
    fn test_missing_required_fields() {
        let draft = ItemDraft {
            product_name: Some("Hay".to_string()),
            business_type: Some(BusinessType::StableOwner),
            ..ItemDraft::default()
        };
        let err = draft.into_item(&MarkupTable::default()).unwrap_err();
        assert_eq!(err.to_string(), "Draft is incomplete: purchase price is required");
    }

    #[test]
    fn test_feed_for_stable_owner() {
        let draft = ItemDraft {
            product_name: Some("Hay".to_string()),
            classification: Some("feed".to_string()),
            business_type: Some(BusinessType::StableOwner),
            list_for_sale: Some(false),
            purchase_price: Some(Money::from_cents(1500)),
            ..ItemDraft::default()
        };
        let item = draft.into_item(&MarkupTable::default()).unwrap();
        assert!(!item.is_medical_item());
        assert_eq!(item.destination_modules().to_vec(), vec![Module::Inventory]);
        assert_eq!(item.profit_margin(), 0);
    }

    #[test]
    fn test_custom_markup_table_applies() {
        let draft = ItemDraft {
            product_name: Some("Lead rope".to_string()),
            classification: Some("tack".to_string()),
            business_type: Some(BusinessType::StableOwner),
            purchase_price: Some(Money::from_cents(1000)),
            ..ItemDraft::default()
        };
        let table = MarkupTable {
            stable_owner_bps: 2500,
            ..MarkupTable::default()
        };
        let item = draft.into_item(&table).unwrap();
        assert_eq!(item.suggested_markup().cents(), 1250);
    }
}

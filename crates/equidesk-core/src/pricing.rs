//! # Pricing Advisor
//!
//! Suggested selling price and profit margin.
//!
//! ## Two Numbers, On Purpose
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchase $12.50                                                        │
//! │       │                                                                 │
//! │       ├──► suggested price = purchase × (1 + markup%)  → $18.75 (+50%)  │
//! │       │    markup% = business base ± classification adjustment         │
//! │       │                                                                 │
//! │       └──► profit margin   = (entered selling − purchase) / purchase    │
//! │                                                                         │
//! │  The suggestion never feeds the margin. The form shows both.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::classifier::{self, ClassificationCategory};
use crate::money::Money;
use crate::rules::rule_for;
use crate::types::{BusinessType, MarkupRate};

// =============================================================================
// Markup Table
// =============================================================================

/// Markup rates per business type and adjustments per category, in basis
/// points.
///
/// Defaults come from the business rule table; the engine config can
/// override any entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTable {
    #[serde(default = "default_stable_owner_bps")]
    pub stable_owner_bps: u32,

    #[serde(default = "default_pharmacy_owner_bps")]
    pub pharmacy_owner_bps: u32,

    #[serde(default = "default_mixed_business_bps")]
    pub mixed_business_bps: u32,

    #[serde(default = "default_medical_adjustment")]
    pub medical_adjustment_bps: i32,

    #[serde(default = "default_supplement_adjustment")]
    pub supplement_adjustment_bps: i32,

    #[serde(default = "default_feed_adjustment")]
    pub feed_adjustment_bps: i32,
}

fn default_stable_owner_bps() -> u32 {
    rule_for(BusinessType::StableOwner).base_markup.bps()
}

fn default_pharmacy_owner_bps() -> u32 {
    rule_for(BusinessType::PharmacyOwner).base_markup.bps()
}

fn default_mixed_business_bps() -> u32 {
    rule_for(BusinessType::MixedBusiness).base_markup.bps()
}

fn default_medical_adjustment() -> i32 {
    1000
}

fn default_supplement_adjustment() -> i32 {
    500
}

fn default_feed_adjustment() -> i32 {
    -500
}

impl Default for MarkupTable {
    fn default() -> Self {
        MarkupTable {
            stable_owner_bps: default_stable_owner_bps(),
            pharmacy_owner_bps: default_pharmacy_owner_bps(),
            mixed_business_bps: default_mixed_business_bps(),
            medical_adjustment_bps: default_medical_adjustment(),
            supplement_adjustment_bps: default_supplement_adjustment(),
            feed_adjustment_bps: default_feed_adjustment(),
        }
    }
}

impl MarkupTable {
    /// Base markup for a business type.
    pub fn base_rate(&self, business_type: BusinessType) -> MarkupRate {
        let bps = match business_type {
            BusinessType::StableOwner => self.stable_owner_bps,
            BusinessType::PharmacyOwner => self.pharmacy_owner_bps,
            BusinessType::MixedBusiness => self.mixed_business_bps,
        };
        MarkupRate::from_bps(bps)
    }

    /// Adjustment applied on top of the base rate for a category.
    pub fn adjustment(&self, category: ClassificationCategory) -> i32 {
        match category {
            ClassificationCategory::Medical => self.medical_adjustment_bps,
            ClassificationCategory::Supplement => self.supplement_adjustment_bps,
            ClassificationCategory::Feed => self.feed_adjustment_bps,
            ClassificationCategory::General => 0,
        }
    }

    /// Effective markup for an item, floored at zero.
    pub fn markup_for(&self, classification: &str, business_type: BusinessType) -> MarkupRate {
        let category = classifier::categorize(classification);
        self.base_rate(business_type)
            .adjusted_by(self.adjustment(category))
    }

    /// Suggested selling price. Zero when the purchase price is not positive.
    pub fn suggested_price(
        &self,
        purchase_price: Money,
        classification: &str,
        business_type: BusinessType,
    ) -> Money {
        if !purchase_price.is_positive() {
            return Money::zero();
        }
        purchase_price.apply_markup(self.markup_for(classification, business_type))
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Suggested selling price using the default markup table.
///
/// ## Example
/// ```rust
/// use equidesk_core::money::Money;
/// use equidesk_core::pricing::calculate_suggested_markup;
/// use equidesk_core::types::BusinessType;
///
/// // pharmacy 40% + medical 10% = 50%
/// let price = calculate_suggested_markup(
///     Money::from_cents(1250),
///     "antibiotic",
///     BusinessType::PharmacyOwner,
/// );
/// assert_eq!(price.cents(), 1875);
/// ```
pub fn calculate_suggested_markup(
    purchase_price: Money,
    classification: &str,
    business_type: BusinessType,
) -> Money {
    MarkupTable::default().suggested_price(purchase_price, classification, business_type)
}

/// Margin of the entered selling price over the purchase price, in whole
/// percent. Zero unless both prices are set and the purchase price is
/// positive.
pub fn profit_margin(purchase_price: Money, selling_price: Option<Money>) -> i64 {
    match selling_price {
        Some(selling) => selling.margin_percent_over(purchase_price),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rates() {
        let table = MarkupTable::default();
        let cost = Money::from_cents(1000);
        assert_eq!(table.suggested_price(cost, "tack", BusinessType::PharmacyOwner).cents(), 1400);
        assert_eq!(table.suggested_price(cost, "tack", BusinessType::MixedBusiness).cents(), 1300);
        assert_eq!(table.suggested_price(cost, "tack", BusinessType::StableOwner).cents(), 1150);
    }

    #[test]
    fn test_category_adjustments() {
        let table = MarkupTable::default();
        assert_eq!(table.markup_for("Vet wrap", BusinessType::PharmacyOwner).bps(), 5000);
        assert_eq!(table.markup_for("Vitamin E", BusinessType::MixedBusiness).bps(), 3500);
        assert_eq!(table.markup_for("Horse Feed", BusinessType::StableOwner).bps(), 1000);
    }

    #[test]
    fn test_adjustment_floors_at_zero() {
        let table = MarkupTable {
            stable_owner_bps: 200,
            ..MarkupTable::default()
        };
        assert_eq!(table.markup_for("hay", BusinessType::StableOwner), MarkupRate::zero());
        let cost = Money::from_cents(800);
        assert_eq!(table.suggested_price(cost, "hay", BusinessType::StableOwner), cost);
    }

    #[test]
    fn test_zero_or_negative_purchase_suggests_zero() {
        assert_eq!(
            calculate_suggested_markup(Money::zero(), "antibiotic", BusinessType::PharmacyOwner),
            Money::zero()
        );
        assert_eq!(
            calculate_suggested_markup(Money::from_cents(-100), "antibiotic", BusinessType::PharmacyOwner),
            Money::zero()
        );
    }

    #[test]
    fn test_profit_margin() {
        let cost = Money::from_cents(1250);
        assert_eq!(profit_margin(cost, Some(Money::from_cents(1875))), 50);
        assert_eq!(profit_margin(cost, None), 0);
        assert_eq!(profit_margin(Money::zero(), Some(Money::from_cents(1875))), 0);
    }

    #[test]
    fn test_suggestion_and_margin_diverge() {
        let cost = Money::from_cents(1000);
        let suggested = calculate_suggested_markup(cost, "tack", BusinessType::PharmacyOwner);
        assert_eq!(suggested.cents(), 1400);
        assert_eq!(profit_margin(cost, Some(Money::from_cents(1200))), 20);
    }

    #[test]
    fn test_table_from_partial_toml_like_json() {
        let table: MarkupTable = serde_json::from_str(r#"{"pharmacy_owner_bps": 4500}"#).unwrap();
        assert_eq!(table.pharmacy_owner_bps, 4500);
        assert_eq!(table.stable_owner_bps, 1500);
        assert_eq!(table.feed_adjustment_bps, -500);
    }
}

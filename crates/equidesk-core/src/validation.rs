//! # Validation Module
//!
//! Sync-readiness checks for inventory items.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Inventory form (UI)                                          │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Every rule evaluated, every failure collected                     │
//! │  └── Any failure blocks the whole sync, no module is attempted         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Module connectors                                            │
//! │  └── Module-local admission rules, failures reported per module        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use equidesk_core::money::Money;
//! use equidesk_core::types::{BusinessType, InventoryItem, UsageIntent};
//! use equidesk_core::validation::validate_item_for_sync;
//!
//! let item = InventoryItem::new("Bute", "tack", BusinessType::PharmacyOwner, Money::from_cents(900))
//!     .with_listing(true, UsageIntent::ForSale);
//!
//! let report = validate_item_for_sync(&item);
//! assert!(!report.is_valid());
//! assert!(report.messages()[0].contains("selling price"));
//! ```

use serde::Serialize;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BusinessType, InventoryItem, Module, PharmacySettings, SalesConfiguration};
use crate::MAX_MARKUP_PERCENTAGE;

/// Result type for single-field validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Validation Report
// =============================================================================

/// Every rule failure found for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// True when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// True if any error refers to `field`.
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    fn check(&mut self, outcome: ValidationResult<()>) {
        if let Err(err) = outcome {
            self.errors.push(err);
        }
    }
}

/// Serialized as the `{ isValid, errors }` shape the form expects.
impl Serialize for ValidationReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.messages())?;
        state.end()
    }
}

// =============================================================================
// Item Validation
// =============================================================================

/// Checks an item against every sync-readiness rule.
///
/// ## Rules
/// - Selling price present and > 0 for listed pharmacy-owner items
/// - Pharmacy settings (dosage form, strength) when routed to pharmacy
/// - Purchase price not negative
/// - At least one destination module
/// - Product name present and not too long
/// - Sales configuration ranges
/// - Controlled substances require a prescription
///
/// All rules run; nothing short-circuits.
pub fn validate_item_for_sync(item: &InventoryItem) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.check(validate_listed_selling_price(item));
    report.check(validate_pharmacy_requirements(item));
    report.check(validate_price("purchase price", item.purchase_price));

    if item.destination_modules().is_empty() {
        report.check(Err(ValidationError::Required {
            field: "destination modules".to_string(),
        }));
    }

    report.check(validate_product_name(&item.product_name));

    if let Some(sales) = &item.sales_configuration {
        report.check(validate_markup_percentage(sales.markup_percentage));
        report.check(validate_minimum_order_quantity(sales));
    }

    if let Some(pharmacy) = &item.pharmacy_settings {
        report.check(validate_controlled_substance(pharmacy));
    }

    report
}

/// Listed items of a pharmacy owner need a positive selling price.
fn validate_listed_selling_price(item: &InventoryItem) -> ValidationResult<()> {
    if item.business_type != BusinessType::PharmacyOwner || !item.list_for_sale {
        return Ok(());
    }

    match item.selling_price {
        None => Err(ValidationError::Required {
            field: "selling price".to_string(),
        }),
        Some(price) if !price.is_positive() => Err(ValidationError::MustBePositive {
            field: "selling price".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Items routed to the pharmacy need dosage form and strength.
fn validate_pharmacy_requirements(item: &InventoryItem) -> ValidationResult<()> {
    if !item.destination_modules().contains(Module::Pharmacy) {
        return Ok(());
    }

    let missing = |field: &str| ValidationError::RequiredFor {
        field: field.to_string(),
        module: Module::Pharmacy,
    };

    let settings = item
        .pharmacy_settings
        .as_ref()
        .ok_or_else(|| missing("pharmacy settings"))?;

    if settings.dosage_form.trim().is_empty() {
        return Err(missing("dosage form"));
    }
    if settings.strength.trim().is_empty() {
        return Err(missing("strength"));
    }

    Ok(())
}

fn validate_controlled_substance(settings: &PharmacySettings) -> ValidationResult<()> {
    if settings.controlled_substance && !settings.requires_prescription {
        return Err(ValidationError::Inconsistent {
            field: "controlled substance".to_string(),
            reason: "must require a prescription".to_string(),
        });
    }
    Ok(())
}

fn validate_minimum_order_quantity(sales: &SalesConfiguration) -> ValidationResult<()> {
    if sales.minimum_order_quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "minimum order quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "product name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates that a price is not negative. Zero is allowed.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a markup percentage (0-1000).
pub fn validate_markup_percentage(pct: u32) -> ValidationResult<()> {
    if pct > MAX_MARKUP_PERCENTAGE {
        return Err(ValidationError::OutOfRange {
            field: "markup percentage".to_string(),
            min: 0,
            max: MAX_MARKUP_PERCENTAGE as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

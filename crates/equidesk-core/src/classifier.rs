//! # Classifier
//!
//! Turns the free-text classification of an item into the flags the rules
//! and pricing need.
//!
//! Matching is a case-insensitive substring search. "Medicalization",
//! "Vetwrap" and "Veterinary paste" all count as medical; this loose match is
//! the agreed behaviour and word-boundary matching is not applied.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Terms that mark an item as medical.
pub const MEDICAL_TERMS: [&str; 3] = ["medical", "vet", "veterinary"];

/// Medication classes the UI offers as classifications on their own.
pub const MEDICATION_TERMS: [&str; 3] = ["antibiotic", "vaccine", "dewormer"];

const SUPPLEMENT_TERMS: [&str; 3] = ["supplement", "vitamin", "electrolyte"];

const FEED_TERMS: [&str; 4] = ["feed", "hay", "grain", "forage"];

/// Coarse product category used to adjust the suggested markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationCategory {
    Medical,
    Supplement,
    Feed,
    General,
}

/// Returns true if the classification names a medical item.
///
/// Total: the empty string and any other text simply return false.
///
/// ## Example
/// ```rust
/// use equidesk_core::classifier::is_medical_item;
///
/// assert!(is_medical_item("Equine VET supplies"));
/// assert!(is_medical_item("antibiotic"));
/// assert!(!is_medical_item("Horse Feed"));
/// assert!(!is_medical_item(""));
/// ```
pub fn is_medical_item(classification: &str) -> bool {
    let lowered = classification.to_lowercase();
    contains_any(&lowered, &MEDICAL_TERMS) || contains_any(&lowered, &MEDICATION_TERMS)
}

/// Buckets a classification into a [`ClassificationCategory`].
///
/// Medical wins over every other match, then supplement, then feed.
pub fn categorize(classification: &str) -> ClassificationCategory {
    if is_medical_item(classification) {
        return ClassificationCategory::Medical;
    }

    let lowered = classification.to_lowercase();
    if contains_any(&lowered, &SUPPLEMENT_TERMS) {
        ClassificationCategory::Supplement
    } else if contains_any(&lowered, &FEED_TERMS) {
        ClassificationCategory::Feed
    } else {
        ClassificationCategory::General
    }
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}

//! # Error Types
//!
//! Domain-specific error types for equidesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  equidesk-core errors (this file)                                      │
//! │  ├── CoreError        - Draft conversion / payload errors              │
//! │  └── ValidationError  - One failed sync-readiness rule                 │
//! │                                                                         │
//! │  equidesk-sync errors (separate crate)                                 │
//! │  ├── ModuleCommitError - One module refused or could not take an item  │
//! │  └── SyncError         - Whole-attempt failures (validation, in-flight)│
//! │                                                                         │
//! │  Flow: ValidationError → ValidationReport → SyncError → UI             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Error messages are shown to the user as-is
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::Module;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The UI payload could not be decoded into an item draft.
    #[error("Invalid item payload: {0}")]
    InvalidPayload(String),

    /// A draft is missing a field that has no smart default.
    ///
    /// ## When This Occurs
    /// - Product name left blank
    /// - Purchase price never entered
    #[error("Draft is incomplete: {field} is required")]
    IncompleteDraft { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidPayload(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single sync-readiness rule failure.
///
/// The validator collects every failing rule into a
/// [`ValidationReport`](crate::validation::ValidationReport); the `Display`
/// text of each variant is what the inventory form shows next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field is required because the item is routed to a module.
    #[error("{field} is required for the {module} module")]
    RequiredFor { field: String, module: Module },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Two fields contradict each other.
    #[error("{field} {reason}")]
    Inconsistent { field: String, reason: String },
}

impl ValidationError {
    /// Returns the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::RequiredFor { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Inconsistent { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product name".to_string(),
        };
        assert_eq!(err.to_string(), "product name is required");

        let err = ValidationError::RequiredFor {
            field: "pharmacy settings".to_string(),
            module: Module::Pharmacy,
        };
        assert_eq!(
            err.to_string(),
            "pharmacy settings is required for the pharmacy module"
        );

        let err = ValidationError::OutOfRange {
            field: "markup percentage".to_string(),
            min: 0,
            max: 1000,
        };
        assert_eq!(err.to_string(), "markup percentage must be between 0 and 1000");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::MustBePositive {
            field: "selling price".to_string(),
        };
        assert_eq!(err.field(), "selling price");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_json_error_converts_to_invalid_payload() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let core_err: CoreError = err.into();
        assert!(matches!(core_err, CoreError::InvalidPayload(_)));
    }
}

//! # Validation Module
//!
//! Input validation utilities shared by the domain constructors.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Constructors (this crate)                                    │
//! │  ├── THIS MODULE: field-level checks (blank ids, non-positive qty)     │
//! │  └── Invariant enforcement (non-empty sales, positive components)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (bodega-store)                                      │
//! │  ├── Cross-entity checks (resolve ids, stock availability)             │
//! │  └── Lifecycle gates (order state machine)                             │
//! │                                                                         │
//! │  There is no schema layer below: the flat files store whatever the     │
//! │  constructors accepted, so rejecting bad values early is the only      │
//! │  gate.                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity identifier.
///
/// ## Rules
/// - Must not be blank
/// - Must be at most 64 characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: 64,
        });
    }

    Ok(())
}

/// Validates a display name (product, supplier).
///
/// ## Rules
/// - Must not be blank
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (sale lines, order items, bundle components).
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit cost.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_cost(cost: Money) -> ValidationResult<()> {
    if cost.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("id", "BREAD").is_ok());
        assert!(validate_id("id", "p_1-a").is_ok());

        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", "   ").is_err());
        assert!(validate_id("id", &"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "White bread 500g").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_cost() {
        assert!(validate_cost(Money::from_cents(0)).is_ok());
        assert!(validate_cost(Money::from_cents(1099)).is_ok());
        assert!(validate_cost(Money::from_cents(-1)).is_err());
    }
}

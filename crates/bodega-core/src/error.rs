//! # Error Types
//!
//! Domain-specific error types for bodega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bodega-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Malformed constructor arguments                │
//! │                                                                         │
//! │  bodega-store errors (separate crate)                                  │
//! │  └── StoreError       - Storage I/O and record-level failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, amounts, states)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or lookup misses.
/// They propagate unhandled to the caller; no operation retries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id could not be resolved.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Supplier id could not be resolved.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Order id could not be resolved.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Insufficient stock to complete an operation.
    ///
    /// Raised during the pre-validation phase of a stock deduction: the
    /// failing product, the total required amount, and what is actually
    /// available. Nothing has been mutated when this is raised.
    #[error("Insufficient stock for {product_id}: required {required}, available {available}")]
    InsufficientStock {
        product_id: String,
        required: u64,
        available: u64,
    },

    /// The order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Sending an order that is not PENDING
    /// - Receiving an order that is not SENT
    /// - Adding items to an order that already left PENDING
    #[error("Order {order_id} is {state}, cannot {operation}")]
    InvalidOrderState {
        order_id: String,
        state: String,
        operation: String,
    },

    /// An order with no items cannot transition out of PENDING.
    #[error("Order {order_id} has no items, cannot send an empty order")]
    EmptyOrder { order_id: String },

    /// A sale must contain at least one line.
    #[error("A sale must contain at least one line")]
    EmptySale,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidOrderState error.
    pub fn invalid_state(
        order_id: impl Into<String>,
        state: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        CoreError::InvalidOrderState {
            order_id: order_id.into(),
            state: state.into(),
            operation: operation.into(),
        }
    }

    /// Creates an InsufficientStock error.
    pub fn insufficient_stock(product_id: impl Into<String>, required: u64, available: u64) -> Self {
        CoreError::InsufficientStock {
            product_id: product_id.into(),
            required,
            available,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when constructor arguments don't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format or structurally broken value.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

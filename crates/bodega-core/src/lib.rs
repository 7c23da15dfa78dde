//! # bodega-core: Pure Business Logic for Bodega
//!
//! This crate is the **heart** of Bodega. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bodega Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation / driver (out of scope)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                bodega-store (Storage Layer)                     │   │
//! │  │      flat-file stores, hydration, inventory/orders services     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │  catalog  │  │   sale    │  │   order   │  │   │
//! │  │   │  Product  │  │ recursive │  │   Sale    │  │ Purchase  │  │   │
//! │  │   │  variants │  │stock math │  │ SaleLine  │  │  Order    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - Product variants (simple / bundle), units, components
//! - [`catalog`] - Recursive price, availability, and two-phase deduction
//! - [`sale`] - Immutable sale records and their named constructors
//! - [`order`] - Replenishment orders and the lifecycle state machine
//! - [`supplier`] - Supplier value objects
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic over its inputs
//! 2. **No I/O**: file system, network, and database access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod sale;
pub mod supplier;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bodega_core::Product` instead of
// `use bodega_core::product::Product`

pub use catalog::{Catalog, Requirements};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderItem, OrderState, PurchaseOrder};
pub use product::{BundleComponent, Product, ProductKind, Unit};
pub use sale::{Sale, SaleLine, SaleRequest};
pub use supplier::Supplier;

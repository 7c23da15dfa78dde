//! # bodega-store: Flat-File Storage Layer for Bodega
//!
//! This crate persists the Bodega domain in delimited flat files and hosts
//! the services that keep those files coherent - no database engine, no
//! transactions, no locks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Bodega Data Flow                                │
//! │                                                                         │
//! │  Driver call (register_sale, receive_order, ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bodega-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │   │
//! │  │   │   services   │   │  repository  │   │      codec       │  │   │
//! │  │   │ inventory /  │──►│ Product/Sale │──►│ escape, split    │  │   │
//! │  │   │ orders +     │   │ Supplier/    │   │ ';'-delimited    │  │   │
//! │  │   │ hydration    │   │ Order stores │   │ records          │  │   │
//! │  │   └──────────────┘   └──────────────┘   └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products.csv  suppliers.csv  sales.csv + sale_lines.csv               │
//! │  orders.csv + order_items.csv  product_suppliers.csv                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`codec`] - field escaping for the delimited format
//! - [`repository`] - the generic store contract and per-entity stores
//! - [`supplier_map`] - the product→supplier association config
//! - [`service`] - inventory/orders services and the hydration layer
//! - [`error`] - storage error types
//!
//! ## Concurrency
//!
//! None. Every operation is synchronous, runs to completion, and assumes a
//! single logical actor drives all mutations. Concurrent writers can lose
//! updates or duplicate detail rows; callers needing that add external
//! serialization.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bodega_store::repository::{product::ProductStore, sale::SaleStore,
//!     order::OrderStore, supplier::SupplierStore};
//! use bodega_store::service::{inventory::InventoryService, orders::OrdersService};
//! use bodega_store::supplier_map::SupplierMap;
//!
//! # fn main() -> Result<(), bodega_store::StoreError> {
//! let data = std::path::Path::new("./data");
//! let products = ProductStore::new(data.join("products.csv"))?;
//! let suppliers = SupplierStore::new(data.join("suppliers.csv"))?;
//! let orders = OrdersService::new(products.clone(), OrderStore::new(data)?, suppliers);
//! let inventory = InventoryService::new(
//!     products,
//!     SaleStore::new(data)?,
//!     orders,
//!     SupplierMap::load(data.join("product_suppliers.csv")),
//! );
//!
//! for product in inventory.list_products()? {
//!     println!("{} x{}", product.name(), product.stock_current());
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod repository;
pub mod service;
pub mod supplier_map;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use repository::Repository;

// Store re-exports for convenience
pub use repository::order::{OrderHeader, OrderStore};
pub use repository::product::ProductStore;
pub use repository::sale::{SaleHeader, SaleLineRecord, SaleStore};
pub use repository::supplier::SupplierStore;
pub use supplier_map::SupplierMap;

// Service re-exports
pub use service::inventory::InventoryService;
pub use service::orders::{BulkOutcome, OrdersService};

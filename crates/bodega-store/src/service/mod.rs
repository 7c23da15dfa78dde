//! # Service Module
//!
//! The operations the presentation/driver layer calls. Services orchestrate
//! the low-level stores and never expose a half-assembled entity: every read
//! that surfaces a complete sale or order goes through [`hydrate`].
//!
//! ## Available Services
//!
//! - [`InventoryService`](inventory::InventoryService) - products, sale
//!   registration, auto-replenishment
//! - [`OrdersService`](orders::OrdersService) - order lifecycle and bulk
//!   send/receive
//! - [`hydrate`] - the reconciliation layer both services read through

pub mod hydrate;
pub mod inventory;
pub mod orders;

//! # Reconciliation / Hydration Layer
//!
//! Rebuilds complete in-memory objects from the split header/detail files
//! plus live lookups against the entity stores.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │        From Three Files To One Consistent Object                        │
//! │                                                                         │
//! │  orders.csv          order_items.csv        products.csv / suppliers   │
//! │  (header: id,        (details: order_id,    (live entities)            │
//! │   supplier_id,        product_id, qty)                                  │
//! │   date, state)               │                      │                   │
//! │        │                     │                      │                   │
//! │        └──────┬──────────────┴──────────┬───────────┘                   │
//! │               ▼                         ▼                               │
//! │      PurchaseOrder::rehydrate   resolve each foreign id LIVE:          │
//! │      (header-only, no items)    current product/supplier object,       │
//! │               │                 placeholder when the id is gone        │
//! │               ▼                                                         │
//! │      complete PurchaseOrder - items filled, references current         │
//! │                                                                         │
//! │  Every read path that surfaces a "complete" sale or order goes         │
//! │  through here; nothing below this layer returns assembled objects.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads never fail on a dangling reference: a deleted product or supplier
//! is replaced by a zeroed placeholder. What DOES fail a read is corrupt
//! order-header data, because a guessed order state would gate stock
//! increments wrongly.

use std::collections::HashMap;

use tracing::warn;

use bodega_core::{CoreError, Product, PurchaseOrder, Sale, SaleLine, Supplier};

use crate::error::StoreResult;
use crate::repository::order::{OrderHeader, OrderStore};
use crate::repository::product::ProductStore;
use crate::repository::sale::SaleStore;
use crate::repository::supplier::SupplierStore;
use crate::repository::Repository;

// =============================================================================
// Sales
// =============================================================================

/// Reads all sales, complete: lines grouped under their headers, every
/// line's product resolved against the live product store.
pub fn sales(sale_store: &SaleStore, products: &ProductStore) -> StoreResult<Vec<Sale>> {
    let live: HashMap<String, Product> = products
        .list()?
        .into_iter()
        .map(|p| (p.id().to_string(), p))
        .collect();

    // group line records by sale id, preserving file order within each sale
    let mut lines_by_sale: HashMap<String, Vec<SaleLine>> = HashMap::new();
    for record in sale_store.lines()? {
        if record.quantity == 0 {
            warn!(sale_id = %record.sale_id, product_id = %record.product_id,
                  "skipping stored sale line with zero quantity");
            continue;
        }
        let product = live
            .get(&record.product_id)
            .cloned()
            .unwrap_or_else(|| Product::placeholder(record.product_id.as_str()));
        let line = SaleLine::new(product, record.quantity, record.unit_price)?;
        lines_by_sale.entry(record.sale_id).or_default().push(line);
    }

    let mut out = Vec::new();
    for header in sale_store.headers()? {
        match lines_by_sale.remove(&header.id) {
            Some(lines) => out.push(Sale::rehydrate(header.id, header.at, lines)?),
            None => {
                // header written, lines lost (or never written): a sale may
                // not be empty, so the husk is skipped rather than served
                warn!(sale_id = %header.id, "skipping sale header with no lines");
            }
        }
    }
    Ok(out)
}

// =============================================================================
// Orders
// =============================================================================

/// Reads one order, complete. Fails with `OrderNotFound` when the header
/// does not exist.
pub fn order(
    order_store: &OrderStore,
    suppliers: &SupplierStore,
    products: &ProductStore,
    id: &str,
) -> StoreResult<PurchaseOrder> {
    let header = order_store
        .find(id)?
        .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;
    assemble(&header, order_store, suppliers, products)
}

/// Reads all orders, complete.
pub fn orders(
    order_store: &OrderStore,
    suppliers: &SupplierStore,
    products: &ProductStore,
) -> StoreResult<Vec<PurchaseOrder>> {
    let mut out = Vec::new();
    for header in order_store.headers()? {
        out.push(assemble(&header, order_store, suppliers, products)?);
    }
    Ok(out)
}

fn assemble(
    header: &OrderHeader,
    order_store: &OrderStore,
    suppliers: &SupplierStore,
    products: &ProductStore,
) -> StoreResult<PurchaseOrder> {
    // the stored header only knows the supplier id; the live supplier
    // replaces it, a placeholder stands in when it is gone
    let supplier = suppliers
        .find(&header.supplier_id)?
        .unwrap_or_else(|| Supplier::placeholder(header.supplier_id.as_str()));

    let mut order =
        PurchaseOrder::rehydrate(header.id.as_str(), supplier, header.created_at, header.state)?;

    for (product_id, quantity) in order_store.items_for(&header.id)? {
        if quantity == 0 {
            warn!(order_id = %header.id, %product_id,
                  "skipping stored order item with zero quantity");
            continue;
        }
        let product = products
            .find(&product_id)?
            .unwrap_or_else(|| Product::placeholder(product_id.as_str()));
        order.add_item(product, quantity)?;
    }
    Ok(order)
}

// =============================================================================
// Unit Tests
// =============================================================================

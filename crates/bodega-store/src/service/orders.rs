//! # Orders Service
//!
//! Drives the replenishment order lifecycle against the stores: creation,
//! item collection, the send/receive transitions that gate stock
//! increments, and the best-effort bulk operations.

use tracing::{debug, info, warn};

use bodega_core::{CoreError, OrderState, PurchaseOrder};

use crate::error::{StoreError, StoreResult};
use crate::repository::order::{OrderHeader, OrderStore};
use crate::repository::product::ProductStore;
use crate::repository::supplier::SupplierStore;
use crate::repository::Repository;
use crate::service::hydrate;

// =============================================================================
// Bulk Outcome
// =============================================================================

/// Result of a bulk send/receive pass.
///
/// Bulk operations are deliberately best-effort: one failing order does not
/// stop the rest. The aggregate success count is the contract; the failure
/// list rides along so callers that care can inspect what was skipped.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// How many orders the operation succeeded on.
    pub succeeded: usize,
    /// Per-order failures, in iteration order. Never re-raised.
    pub failures: Vec<(String, StoreError)>,
}

// =============================================================================
// Orders Service
// =============================================================================

/// Service for replenishment orders.
///
/// Holds cheap-clone store handles; all state lives in the files.
#[derive(Debug, Clone)]
pub struct OrdersService {
    products: ProductStore,
    orders: OrderStore,
    suppliers: SupplierStore,
}

impl OrdersService {
    pub fn new(products: ProductStore, orders: OrderStore, suppliers: SupplierStore) -> Self {
        OrdersService {
            products,
            orders,
            suppliers,
        }
    }

    /// Creates a new PENDING order for a supplier and persists its header.
    ///
    /// Fails with `SupplierNotFound` when the supplier id does not resolve.
    pub fn create_order(&self, supplier_id: &str) -> StoreResult<PurchaseOrder> {
        let supplier = self
            .suppliers
            .find(supplier_id)?
            .ok_or_else(|| CoreError::SupplierNotFound(supplier_id.to_string()))?;
        let order = PurchaseOrder::new(supplier);
        self.orders.upsert(&OrderHeader::from(&order))?;
        info!(id = %order.id(), %supplier_id, "order created");
        Ok(order)
    }

    /// Adds `quantity` units of a product to a PENDING order.
    ///
    /// Policy: orders that already left PENDING reject item mutation with an
    /// invalid-state error - the item rows of a SENT order feed the receive
    /// stock increment and must match what was sent.
    ///
    /// Repeated adds of the same product merge in memory; on disk the item
    /// file keeps the first stored row (see `OrderStore::append_item`).
    pub fn add_item(&self, order_id: &str, product_id: &str, quantity: u32) -> StoreResult<()> {
        let mut order = self.load_order(order_id)?;
        if order.state() != OrderState::Pending {
            return Err(CoreError::invalid_state(
                order_id,
                order.state().as_str(),
                "add items",
            )
            .into());
        }
        let product = self
            .products
            .find(product_id)?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        order.add_item(product, quantity)?;
        debug!(%order_id, %product_id, %quantity, "order item added");

        // header first (covers a freshly created order), then the item row
        self.orders.upsert(&OrderHeader::from(&order))?;
        self.orders.append_item(order_id, product_id, quantity)
    }

    /// Marks an order as sent and persists the transition.
    pub fn send_order(&self, order_id: &str) -> StoreResult<PurchaseOrder> {
        let mut order = self.load_order(order_id)?;
        order.mark_sent()?;
        self.orders.upsert(&OrderHeader::from(&order))?;
        info!(id = %order_id, "order sent");
        Ok(order)
    }

    /// Receives an order: increments stock for every item, then marks the
    /// order RECEIVED and persists the transition.
    ///
    /// Fails with an invalid-state error - stock untouched - unless the
    /// order is currently SENT. Items whose product no longer exists are
    /// warned and skipped rather than resurrected from a placeholder.
    pub fn receive_order(&self, order_id: &str) -> StoreResult<PurchaseOrder> {
        let mut order = self.load_order(order_id)?;
        if order.state() != OrderState::Sent {
            return Err(CoreError::invalid_state(
                order_id,
                order.state().as_str(),
                "receive",
            )
            .into());
        }

        for item in order.items() {
            match self.products.find(item.product().id())? {
                Some(mut product) => {
                    product.restock(item.quantity())?;
                    self.products.upsert(&product)?;
                    debug!(product_id = %product.id(), quantity = item.quantity(),
                           "stock incremented from received order");
                }
                None => {
                    warn!(order_id = %order.id(), product_id = %item.product().id(),
                          "ordered product no longer exists, skipping its stock increment");
                }
            }
        }

        order.mark_received()?;
        self.orders.upsert(&OrderHeader::from(&order))?;
        info!(id = %order_id, "order received");
        Ok(order)
    }

    /// Sends every PENDING order that has at least one item.
    ///
    /// Best-effort: per-order failures are logged and collected, never
    /// re-raised.
    pub fn send_all_pending(&self) -> StoreResult<BulkOutcome> {
        let mut outcome = BulkOutcome::default();
        for order in self.list_orders()? {
            if order.state() != OrderState::Pending || order.items().is_empty() {
                continue;
            }
            match self.send_order(order.id()) {
                Ok(_) => outcome.succeeded += 1,
                Err(err) => {
                    warn!(id = %order.id(), %err, "bulk send skipped a failing order");
                    outcome.failures.push((order.id().to_string(), err));
                }
            }
        }
        info!(sent = outcome.succeeded, failed = outcome.failures.len(), "bulk send finished");
        Ok(outcome)
    }

    /// Receives every SENT order that has at least one item.
    ///
    /// Best-effort, same semantics as [`send_all_pending`](Self::send_all_pending).
    pub fn receive_all_sent(&self) -> StoreResult<BulkOutcome> {
        let mut outcome = BulkOutcome::default();
        for order in self.list_orders()? {
            if order.state() != OrderState::Sent || order.items().is_empty() {
                continue;
            }
            match self.receive_order(order.id()) {
                Ok(_) => outcome.succeeded += 1,
                Err(err) => {
                    warn!(id = %order.id(), %err, "bulk receive skipped a failing order");
                    outcome.failures.push((order.id().to_string(), err));
                }
            }
        }
        info!(received = outcome.succeeded, failed = outcome.failures.len(), "bulk receive finished");
        Ok(outcome)
    }

    /// All orders, complete (hydrated).
    pub fn list_orders(&self) -> StoreResult<Vec<PurchaseOrder>> {
        hydrate::orders(&self.orders, &self.suppliers, &self.products)
    }

    /// One order, complete (hydrated).
    pub fn load_order(&self, order_id: &str) -> StoreResult<PurchaseOrder> {
        hydrate::order(&self.orders, &self.suppliers, &self.products, order_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::{Money, OrderState, Product, Supplier, Unit};
    use tempfile::tempdir;

    fn service(dir: &tempfile::TempDir) -> OrdersService {
        let products = ProductStore::new(dir.path().join("products.csv")).unwrap();
        let suppliers = SupplierStore::new(dir.path().join("suppliers.csv")).unwrap();
        let orders = OrderStore::new(dir.path()).unwrap();
        suppliers
            .upsert(&Supplier::new("SUP-1", "Mill & Co", "mill@example.com").unwrap())
            .unwrap();
        products
            .upsert(
                &Product::simple("BREAD", "White bread", 3, 5, Unit::Piece, Money::from_cents(150))
                    .unwrap(),
            )
            .unwrap();
        OrdersService::new(products, orders, suppliers)
    }

    #[test]
    fn test_create_order_requires_supplier() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        assert!(matches!(
            svc.create_order("SUP-NONE"),
            Err(StoreError::Core(CoreError::SupplierNotFound(_)))
        ));

        let order = svc.create_order("SUP-1").unwrap();
        assert_eq!(order.state(), OrderState::Pending);
        assert_eq!(svc.load_order(order.id()).unwrap().state(), OrderState::Pending);
    }

    #[test]
    fn test_add_item_persists_and_merges() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        let order = svc.create_order("SUP-1").unwrap();

        svc.add_item(order.id(), "BREAD", 2).unwrap();
        let loaded = svc.load_order(order.id()).unwrap();
        assert_eq!(loaded.items().len(), 1);
        assert_eq!(loaded.items()[0].quantity(), 2);

        assert!(matches!(
            svc.add_item(order.id(), "GHOST", 1),
            Err(StoreError::Core(CoreError::ProductNotFound(_)))
        ));
    }

    #[test]
    fn test_add_item_rejected_after_send() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        let order = svc.create_order("SUP-1").unwrap();
        svc.add_item(order.id(), "BREAD", 2).unwrap();
        svc.send_order(order.id()).unwrap();

        assert!(matches!(
            svc.add_item(order.id(), "BREAD", 1),
            Err(StoreError::Core(CoreError::InvalidOrderState { .. }))
        ));
    }

    #[test]
    fn test_send_requires_items() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        let order = svc.create_order("SUP-1").unwrap();
        assert!(matches!(
            svc.send_order(order.id()),
            Err(StoreError::Core(CoreError::EmptyOrder { .. }))
        ));
    }

    #[test]
    fn test_receive_lifecycle_increments_stock_exactly_once() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        let order = svc.create_order("SUP-1").unwrap();
        svc.add_item(order.id(), "BREAD", 4).unwrap();

        // cannot receive a PENDING order, stock untouched
        assert!(matches!(
            svc.receive_order(order.id()),
            Err(StoreError::Core(CoreError::InvalidOrderState { .. }))
        ));
        assert_eq!(svc.products.find("BREAD").unwrap().unwrap().stock_current(), 3);

        svc.send_order(order.id()).unwrap();
        let received = svc.receive_order(order.id()).unwrap();
        assert_eq!(received.state(), OrderState::Received);
        assert_eq!(svc.products.find("BREAD").unwrap().unwrap().stock_current(), 7);

        // RECEIVED is terminal: a second receive fails and stock stays put
        assert!(matches!(
            svc.receive_order(order.id()),
            Err(StoreError::Core(CoreError::InvalidOrderState { .. }))
        ));
        assert_eq!(svc.products.find("BREAD").unwrap().unwrap().stock_current(), 7);
    }

    #[test]
    fn test_receive_skips_vanished_product() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        let order = svc.create_order("SUP-1").unwrap();
        svc.add_item(order.id(), "BREAD", 4).unwrap();
        svc.send_order(order.id()).unwrap();

        svc.products.delete("BREAD").unwrap();
        let received = svc.receive_order(order.id()).unwrap();
        assert_eq!(received.state(), OrderState::Received);
        // the deleted product was NOT resurrected
        assert!(svc.products.find("BREAD").unwrap().is_none());
    }

    #[test]
    fn test_bulk_send_and_receive() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);

        let with_items = svc.create_order("SUP-1").unwrap();
        svc.add_item(with_items.id(), "BREAD", 2).unwrap();
        let empty = svc.create_order("SUP-1").unwrap(); // stays PENDING, no items

        let sent = svc.send_all_pending().unwrap();
        assert_eq!(sent.succeeded, 1);
        assert!(sent.failures.is_empty());
        assert_eq!(svc.load_order(empty.id()).unwrap().state(), OrderState::Pending);

        let received = svc.receive_all_sent().unwrap();
        assert_eq!(received.succeeded, 1);
        assert_eq!(svc.products.find("BREAD").unwrap().unwrap().stock_current(), 5);

        // nothing left to receive
        assert_eq!(svc.receive_all_sent().unwrap().succeeded, 0);
    }
}

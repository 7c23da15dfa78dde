//! # Inventory Service
//!
//! Product management, the sale registration protocol, and the
//! auto-replenishment trigger.
//!
//! ## Sale Registration Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Two Phases, Zero Partial Mutation                      │
//! │                                                                         │
//! │  requests: [(SANDWICH, 2), (BREAD, 1)]                                 │
//! │       │                                                                 │
//! │  ── VALIDATE ─────────────────────────────────────────────────────     │
//! │       │  load the whole catalog once                                   │
//! │       │  expand every request to simple-product requirements,          │
//! │       │  merged into ONE running-total map (two lines for the same     │
//! │       │  product are checked together, not independently)              │
//! │       │  any unknown id        → NotFound, nothing written             │
//! │       │  any shortfall         → InsufficientStock, nothing written    │
//! │       ▼                                                                 │
//! │  ── APPLY ────────────────────────────────────────────────────────     │
//! │          debit every requirement in memory                             │
//! │          snapshot each line's unit price at the current price          │
//! │          compose the immutable Sale (id + timestamp generated)         │
//! │          append the sale, then persist every debited product           │
//! │                                                                         │
//! │  The two persistence steps are not atomic across files; that window    │
//! │  is the accepted partial-write risk of the format.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use bodega_core::{Catalog, CoreError, Product, PurchaseOrder, Sale, SaleLine, SaleRequest};

use crate::error::StoreResult;
use crate::repository::product::ProductStore;
use crate::repository::sale::SaleStore;
use crate::repository::Repository;
use crate::service::hydrate;
use crate::service::orders::OrdersService;
use crate::supplier_map::SupplierMap;

/// Service for products, sales, and the replenishment trigger.
#[derive(Debug, Clone)]
pub struct InventoryService {
    products: ProductStore,
    sales: SaleStore,
    orders: OrdersService,
    supplier_map: SupplierMap,
}

impl InventoryService {
    pub fn new(
        products: ProductStore,
        sales: SaleStore,
        orders: OrdersService,
        supplier_map: SupplierMap,
    ) -> Self {
        InventoryService {
            products,
            sales,
            orders,
            supplier_map,
        }
    }

    /// The orders service this inventory feeds replenishment orders into.
    pub fn orders(&self) -> &OrdersService {
        &self.orders
    }

    // -------------------------------------------------------------------------
    // Product management
    // -------------------------------------------------------------------------

    /// Inserts or replaces a product.
    pub fn save_product(&self, product: &Product) -> StoreResult<()> {
        self.products.upsert(product)
    }

    /// Removes a product. No-op when the id is unknown.
    pub fn remove_product(&self, id: &str) -> StoreResult<()> {
        self.products.delete(id)
    }

    /// All products, in store order.
    pub fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.products.list()
    }

    /// One product by id.
    pub fn find_product(&self, id: &str) -> StoreResult<Option<Product>> {
        self.products.find(id)
    }

    // -------------------------------------------------------------------------
    // Sale registration
    // -------------------------------------------------------------------------

    /// Registers a sale: validates every request, debits stock, persists the
    /// sale and every mutated product.
    ///
    /// All-or-nothing: any unknown product or stock shortfall fails the
    /// whole operation before anything is mutated or written.
    pub fn register_sale(&self, requests: &[SaleRequest]) -> StoreResult<Sale> {
        if requests.is_empty() {
            return Err(CoreError::EmptySale.into());
        }

        let mut catalog = Catalog::new(self.products.list()?);
        let demands: Vec<(&str, u32)> = requests
            .iter()
            .map(|r| (r.product_id(), r.quantity()))
            .collect();

        // validate phase: one merged requirements map across ALL lines
        let needs = catalog.requirements(&demands)?;
        catalog.check(&needs)?;

        // apply phase
        catalog.apply(&needs)?;

        let mut lines = Vec::with_capacity(requests.len());
        for request in requests {
            let unit_price = catalog.price_of(request.product_id())?;
            let product = catalog
                .get(request.product_id())
                .cloned()
                .ok_or_else(|| CoreError::ProductNotFound(request.product_id().to_string()))?;
            lines.push(SaleLine::new(product, request.quantity(), unit_price)?);
        }
        let sale = Sale::compose(lines)?;

        self.sales.append(&sale)?;
        for product_id in needs.keys() {
            if let Some(product) = catalog.get(product_id) {
                self.products.upsert(product)?;
            }
        }

        info!(id = %sale.id(), lines = sale.lines().len(), total = %sale.total(), "sale registered");
        Ok(sale)
    }

    /// All sales, complete (hydrated).
    pub fn list_sales(&self) -> StoreResult<Vec<Sale>> {
        hydrate::sales(&self.sales, &self.products)
    }

    // -------------------------------------------------------------------------
    // Auto-replenishment
    // -------------------------------------------------------------------------

    /// Raises a replenishment order for a product that fell below its
    /// minimum.
    ///
    /// No-op (returns `None`) when stock is at or above the minimum, or when
    /// no supplier is associated with the product. Otherwise creates a fresh
    /// PENDING order for the configured supplier with one item covering the
    /// shortfall, and returns it complete.
    pub fn restock_if_needed(&self, product: &Product) -> StoreResult<Option<PurchaseOrder>> {
        if !product.below_minimum() {
            return Ok(None);
        }
        let shortfall = product.stock_minimum() - product.stock_current();

        let Some(supplier_id) = self.supplier_map.supplier_for(product.id()) else {
            debug!(product_id = %product.id(), "below minimum but no supplier associated");
            return Ok(None);
        };

        let order = self.orders.create_order(supplier_id)?;
        self.orders.add_item(order.id(), product.id(), shortfall)?;
        info!(product_id = %product.id(), %shortfall, order_id = %order.id(),
              "replenishment order raised");
        self.orders.load_order(order.id()).map(Some)
    }

    /// Runs the replenishment rule over every stored product.
    ///
    /// Each triggering product yields its own order (no batching). Returns
    /// how many orders were raised.
    pub fn restock_all(&self) -> StoreResult<usize> {
        let mut raised = 0;
        for product in self.products.list()? {
            if self.restock_if_needed(&product)?.is_some() {
                raised += 1;
            }
        }
        Ok(raised)
    }

    // -------------------------------------------------------------------------
    // Supplier association
    // -------------------------------------------------------------------------

    /// Associates a product with the supplier replenishment orders go to.
    pub fn associate_supplier(&mut self, product_id: &str, supplier_id: &str) -> StoreResult<()> {
        self.supplier_map.associate(product_id, supplier_id)
    }

    /// Removes a product's supplier association.
    pub fn dissociate_supplier(&mut self, product_id: &str) -> StoreResult<()> {
        self.supplier_map.dissociate(product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::repository::order::OrderStore;
    use crate::repository::supplier::SupplierStore;
    use bodega_core::{BundleComponent, Money, OrderState, Supplier, Unit};
    use tempfile::tempdir;

    fn service(dir: &tempfile::TempDir) -> InventoryService {
        let products = ProductStore::new(dir.path().join("products.csv")).unwrap();
        let suppliers = SupplierStore::new(dir.path().join("suppliers.csv")).unwrap();
        let order_store = OrderStore::new(dir.path()).unwrap();
        let sales = SaleStore::new(dir.path()).unwrap();
        let orders = OrdersService::new(products.clone(), order_store, suppliers.clone());
        let supplier_map = SupplierMap::load(dir.path().join("product_suppliers.csv"));

        suppliers
            .upsert(&Supplier::new("SUP-1", "Mill & Co", "mill@example.com").unwrap())
            .unwrap();

        InventoryService::new(products, sales, orders, supplier_map)
    }

    fn seed(svc: &InventoryService) {
        svc.save_product(
            &Product::simple("BREAD", "White bread", 10, 5, Unit::Piece, Money::from_cents(150))
                .unwrap(),
        )
        .unwrap();
        svc.save_product(
            &Product::simple("CHEESE", "Cheese", 4, 2, Unit::Kilogram, Money::from_cents(800))
                .unwrap(),
        )
        .unwrap();
        svc.save_product(
            &Product::bundle(
                "SANDWICH",
                "Sandwich",
                vec![
                    BundleComponent::new("BREAD", 2).unwrap(),
                    BundleComponent::new("CHEESE", 1).unwrap(),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    }

    fn stock(svc: &InventoryService, id: &str) -> u32 {
        svc.find_product(id).unwrap().unwrap().stock_current()
    }

    #[test]
    fn test_register_sale_decrements_and_persists() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        seed(&svc);

        let sale = svc
            .register_sale(&[SaleRequest::new("BREAD", 3).unwrap()])
            .unwrap();
        assert_eq!(sale.total().cents(), 450);
        assert_eq!(stock(&svc, "BREAD"), 7);

        let listed = svc.list_sales().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), sale.id());
        assert_eq!(listed[0].total().cents(), 450);
    }

    #[test]
    fn test_register_sale_with_bundle_debits_components() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        seed(&svc);

        let sale = svc
            .register_sale(&[SaleRequest::new("SANDWICH", 2).unwrap()])
            .unwrap();
        // price: 2 × (2×150 + 800)
        assert_eq!(sale.total().cents(), 2200);
        assert_eq!(stock(&svc, "BREAD"), 6);
        assert_eq!(stock(&svc, "CHEESE"), 2);
        assert_eq!(stock(&svc, "SANDWICH"), 0); // bundles never hold stock
    }

    #[test]
    fn test_register_sale_unknown_product_is_all_or_nothing() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        seed(&svc);

        let err = svc
            .register_sale(&[
                SaleRequest::new("BREAD", 1).unwrap(),
                SaleRequest::new("GHOST", 1).unwrap(),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::ProductNotFound(ref id)) if id == "GHOST"
        ));
        assert_eq!(stock(&svc, "BREAD"), 10);
        assert!(svc.list_sales().unwrap().is_empty());
    }

    #[test]
    fn test_two_lines_same_product_validated_together() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        svc.save_product(
            &Product::simple("X", "X", 5, 0, Unit::Piece, Money::from_cents(100)).unwrap(),
        )
        .unwrap();

        // each line alone passes (3 ≤ 5); together they need 6
        let err = svc
            .register_sale(&[
                SaleRequest::new("X", 3).unwrap(),
                SaleRequest::new("X", 3).unwrap(),
            ])
            .unwrap_err();
        match err {
            StoreError::Core(CoreError::InsufficientStock {
                product_id,
                required,
                available,
            }) => {
                assert_eq!(product_id, "X");
                assert_eq!(required, 6);
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stock(&svc, "X"), 5);
        assert!(svc.list_sales().unwrap().is_empty());
    }

    #[test]
    fn test_register_sale_rejects_empty_request() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        assert!(matches!(
            svc.register_sale(&[]),
            Err(StoreError::Core(CoreError::EmptySale))
        ));
    }

    #[test]
    fn test_restock_if_needed_noop_at_or_above_minimum() {
        let dir = tempdir().unwrap();
        let mut svc = service(&dir);
        seed(&svc);
        svc.associate_supplier("BREAD", "SUP-1").unwrap();

        let bread = svc.find_product("BREAD").unwrap().unwrap(); // 10 ≥ 5
        assert!(svc.restock_if_needed(&bread).unwrap().is_none());
        assert!(svc.orders().list_orders().unwrap().is_empty());
    }

    #[test]
    fn test_restock_if_needed_noop_without_association() {
        let dir = tempdir().unwrap();
        let svc = service(&dir);
        svc.save_product(
            &Product::simple("LOW", "Low", 1, 5, Unit::Piece, Money::from_cents(100)).unwrap(),
        )
        .unwrap();

        let low = svc.find_product("LOW").unwrap().unwrap();
        assert!(svc.restock_if_needed(&low).unwrap().is_none());
        assert!(svc.orders().list_orders().unwrap().is_empty());
    }

    #[test]
    fn test_restock_all_raises_one_order_per_product() {
        let dir = tempdir().unwrap();
        let mut svc = service(&dir);
        for id in ["A", "B"] {
            svc.save_product(
                &Product::simple(id, id, 1, 4, Unit::Piece, Money::from_cents(100)).unwrap(),
            )
            .unwrap();
            svc.associate_supplier(id, "SUP-1").unwrap();
        }

        assert_eq!(svc.restock_all().unwrap(), 2);
        let orders = svc.orders().list_orders().unwrap();
        assert_eq!(orders.len(), 2); // no batching into one order
        for order in &orders {
            assert_eq!(order.items().len(), 1);
            assert_eq!(order.items()[0].quantity(), 3); // 4 − 1
        }
    }

    /// End-to-end: sell below the minimum, auto-replenish, send, receive.
    #[test]
    fn test_end_to_end_replenishment_cycle() {
        let dir = tempdir().unwrap();
        let mut svc = service(&dir);
        svc.save_product(
            &Product::simple("PAN", "Pan", 10, 5, Unit::Piece, Money::from_cents(120)).unwrap(),
        )
        .unwrap();
        svc.associate_supplier("PAN", "SUP-1").unwrap();

        // sell 7 → stock 3
        svc.register_sale(&[SaleRequest::new("PAN", 7).unwrap()])
            .unwrap();
        assert_eq!(stock(&svc, "PAN"), 3);

        // auto-replenishment: one PENDING order with (PAN, 5−3 = 2)
        let pan = svc.find_product("PAN").unwrap().unwrap();
        let order = svc.restock_if_needed(&pan).unwrap().unwrap();
        assert_eq!(order.state(), OrderState::Pending);
        assert_eq!(order.supplier().id(), "SUP-1");
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].product().id(), "PAN");
        assert_eq!(order.items()[0].quantity(), 2);

        // send, then receive → stock back at the minimum
        svc.orders().send_order(order.id()).unwrap();
        let received = svc.orders().receive_order(order.id()).unwrap();
        assert_eq!(received.state(), OrderState::Received);
        assert_eq!(stock(&svc, "PAN"), 5);
    }
}

//! # Replenishment Order Model
//!
//! Order header, item list, and the lifecycle state machine that gates when
//! stock may be incremented.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │   PENDING ──mark_sent()──► SENT ──mark_received()──► RECEIVED          │
//! │      │                       │                           │              │
//! │      │ items may be added    │ stock is incremented      │ terminal;    │
//! │      │ (merge-summed)        │ at the receive step,      │ no state is  │
//! │      │                       │ not before                │ revisited    │
//! │      ▼                       ▼                           ▼              │
//! │   mark_sent requires      mark_received requires      any further       │
//! │   PENDING + non-empty     SENT + non-empty            transition fails  │
//! │                                                                         │
//! │   Every other transition fails with an invalid-state error.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::product::Product;
use crate::supplier::Supplier;
use crate::validation::{validate_id, validate_quantity};

// =============================================================================
// Order State
// =============================================================================

/// The lifecycle state of a replenishment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Initial state; items are being collected.
    Pending,
    /// Handed to the supplier; waiting for goods.
    Sent,
    /// Goods arrived and stock was incremented. Terminal.
    Received,
}

impl OrderState {
    /// Stable storage token for this state.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pending => "PENDING",
            OrderState::Sent => "SENT",
            OrderState::Received => "RECEIVED",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderState::Pending),
            "SENT" => Ok(OrderState::Sent),
            "RECEIVED" => Ok(OrderState::Received),
            other => Err(ValidationError::InvalidFormat {
                field: "state".to_string(),
                reason: format!("unknown order state '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// One item of an order: a product and the quantity requested from the
/// supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    product: Product,
    quantity: u32,
}

impl OrderItem {
    #[inline]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[inline]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Purchase Order
// =============================================================================

/// A replenishment order addressed to a supplier.
///
/// The item list is private and insertion-ordered; repeated adds of the same
/// product merge by summing quantities. Reads see only an immutable view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: String,
    supplier: Supplier,
    items: Vec<OrderItem>,
    created_at: NaiveDate,
    sent_at: Option<NaiveDate>,
    received_at: Option<NaiveDate>,
    state: OrderState,
}

impl PurchaseOrder {
    /// Fresh-creation constructor: generates the id, stamps today, starts
    /// PENDING with no items.
    pub fn new(supplier: Supplier) -> Self {
        PurchaseOrder {
            id: format!("O-{}", Uuid::new_v4()),
            supplier,
            items: Vec::new(),
            created_at: Utc::now().date_naive(),
            sent_at: None,
            received_at: None,
            state: OrderState::Pending,
        }
    }

    /// Rehydration constructor: accepts stored id, creation date, and state.
    ///
    /// The item list starts empty; the reconciliation layer fills it from
    /// the detail store. The send/receive stamps are not part of the stored
    /// header, so a rehydrated order carries none.
    pub fn rehydrate(
        id: impl Into<String>,
        supplier: Supplier,
        created_at: NaiveDate,
        state: OrderState,
    ) -> CoreResult<Self> {
        let id = id.into();
        validate_id("order id", &id)?;
        Ok(PurchaseOrder {
            id,
            supplier,
            items: Vec::new(),
            created_at,
            sent_at: None,
            received_at: None,
            state,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn supplier(&self) -> &Supplier {
        &self.supplier
    }

    /// Read-only view of the items, in insertion order.
    #[inline]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    #[inline]
    pub const fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    #[inline]
    pub const fn sent_at(&self) -> Option<NaiveDate> {
        self.sent_at
    }

    #[inline]
    pub const fn received_at(&self) -> Option<NaiveDate> {
        self.received_at
    }

    #[inline]
    pub const fn state(&self) -> OrderState {
        self.state
    }

    // -------------------------------------------------------------------------
    // Item management
    // -------------------------------------------------------------------------

    /// Adds `quantity` units of a product to the order.
    ///
    /// If the product is already on the order, the quantities are summed;
    /// insertion order is preserved.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product.id() == product.id())
        {
            existing.quantity += quantity;
        } else {
            self.items.push(OrderItem { product, quantity });
        }
        Ok(())
    }

    /// Removes a product from the order entirely. No-op when absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product.id() != product_id);
    }

    // -------------------------------------------------------------------------
    // State machine
    // -------------------------------------------------------------------------

    /// Marks the order as sent to its supplier.
    ///
    /// Requires PENDING state and at least one item; stamps `sent_at`.
    pub fn mark_sent(&mut self) -> CoreResult<()> {
        if self.state != OrderState::Pending {
            return Err(CoreError::invalid_state(
                self.id.as_str(),
                self.state.as_str(),
                "mark as sent",
            ));
        }
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder {
                order_id: self.id.clone(),
            });
        }
        self.state = OrderState::Sent;
        self.sent_at = Some(Utc::now().date_naive());
        Ok(())
    }

    /// Marks the order as received.
    ///
    /// Requires SENT state and at least one item; stamps `received_at`.
    /// Incrementing stock for the items is the orders service's job and
    /// happens before this transition is persisted.
    pub fn mark_received(&mut self) -> CoreResult<()> {
        if self.state != OrderState::Sent {
            return Err(CoreError::invalid_state(
                self.id.as_str(),
                self.state.as_str(),
                "mark as received",
            ));
        }
        if self.items.is_empty() {
            return Err(CoreError::EmptyOrder {
                order_id: self.id.clone(),
            });
        }
        self.state = OrderState::Received;
        self.received_at = Some(Utc::now().date_naive());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::product::Unit;

    fn supplier() -> Supplier {
        Supplier::new("SUP-1", "Mill & Co", "mill@example.com").unwrap()
    }

    fn product(id: &str) -> Product {
        Product::simple(id, id, 0, 0, Unit::Piece, Money::zero()).unwrap()
    }

    #[test]
    fn test_new_order_starts_pending_and_empty() {
        let order = PurchaseOrder::new(supplier());
        assert!(order.id().starts_with("O-"));
        assert_eq!(order.state(), OrderState::Pending);
        assert!(order.items().is_empty());
        assert_eq!(order.sent_at(), None);
        assert_eq!(order.received_at(), None);
    }

    #[test]
    fn test_add_item_merges_quantities() {
        let mut order = PurchaseOrder::new(supplier());
        order.add_item(product("BREAD"), 3).unwrap();
        order.add_item(product("CHEESE"), 1).unwrap();
        order.add_item(product("BREAD"), 2).unwrap();

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[0].product().id(), "BREAD");
        assert_eq!(order.items()[0].quantity(), 5);
        assert_eq!(order.items()[1].product().id(), "CHEESE");
    }

    #[test]
    fn test_add_item_rejects_zero() {
        let mut order = PurchaseOrder::new(supplier());
        assert!(order.add_item(product("BREAD"), 0).is_err());
    }

    #[test]
    fn test_remove_item() {
        let mut order = PurchaseOrder::new(supplier());
        order.add_item(product("BREAD"), 3).unwrap();
        order.remove_item("BREAD");
        assert!(order.items().is_empty());
        // removing an absent product is a no-op
        order.remove_item("CHEESE");
    }

    #[test]
    fn test_mark_sent_requires_items() {
        let mut order = PurchaseOrder::new(supplier());
        assert!(matches!(
            order.mark_sent(),
            Err(CoreError::EmptyOrder { .. })
        ));
        assert_eq!(order.state(), OrderState::Pending);
    }

    #[test]
    fn test_mark_sent_happy_path() {
        let mut order = PurchaseOrder::new(supplier());
        order.add_item(product("BREAD"), 3).unwrap();
        order.mark_sent().unwrap();
        assert_eq!(order.state(), OrderState::Sent);
        assert!(order.sent_at().is_some());

        // sending twice is an invalid transition
        assert!(matches!(
            order.mark_sent(),
            Err(CoreError::InvalidOrderState { .. })
        ));
    }

    #[test]
    fn test_mark_received_requires_sent() {
        let mut order = PurchaseOrder::new(supplier());
        order.add_item(product("BREAD"), 3).unwrap();
        assert!(matches!(
            order.mark_received(),
            Err(CoreError::InvalidOrderState { .. })
        ));

        order.mark_sent().unwrap();
        order.mark_received().unwrap();
        assert_eq!(order.state(), OrderState::Received);
        assert!(order.received_at().is_some());

        // RECEIVED is terminal
        assert!(matches!(
            order.mark_received(),
            Err(CoreError::InvalidOrderState { .. })
        ));
    }

    #[test]
    fn test_rehydrate_is_header_only() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let order =
            PurchaseOrder::rehydrate("O-7", supplier(), date, OrderState::Sent).unwrap();
        assert_eq!(order.id(), "O-7");
        assert_eq!(order.created_at(), date);
        assert_eq!(order.state(), OrderState::Sent);
        assert!(order.items().is_empty());
        assert_eq!(order.sent_at(), None);
    }

    #[test]
    fn test_state_round_trip() {
        for state in [OrderState::Pending, OrderState::Sent, OrderState::Received] {
            assert_eq!(state.as_str().parse::<OrderState>().unwrap(), state);
        }
        assert!("SHIPPED".parse::<OrderState>().is_err());
    }
}

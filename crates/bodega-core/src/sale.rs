//! # Sale Model
//!
//! Immutable sale records: line items with snapshotted unit prices.
//!
//! ## Construction Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Sales Come Into Being                            │
//! │                                                                         │
//! │  Fresh creation (registration protocol)                                 │
//! │    Sale::compose(lines)                                                 │
//! │    ├── generates id (S-<uuid>) and timestamp                            │
//! │    └── rejects an empty line list                                       │
//! │                                                                         │
//! │  Rehydration (reconciliation layer)                                     │
//! │    Sale::rehydrate(id, at, lines)                                       │
//! │    ├── accepts the stored id/timestamp as-is                            │
//! │    └── still rejects an empty line list - a sale is never empty         │
//! │                                                                         │
//! │  There is no third path: a Sale cannot be assembled field by field.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::product::Product;
use crate::validation::{validate_id, validate_quantity};

// =============================================================================
// Sale Request
// =============================================================================

/// One requested item of a sale: a product id and how many units.
///
/// Input DTO for the registration protocol; validated at construction so
/// malformed requests never reach the stock math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    product_id: String,
    quantity: u32,
}

impl SaleRequest {
    /// Creates a request; the product id must be non-blank, the quantity
    /// strictly positive.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> CoreResult<Self> {
        let product_id = product_id.into();
        validate_id("product id", &product_id)?;
        validate_quantity(quantity)?;
        Ok(SaleRequest {
            product_id,
            quantity,
        })
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    #[inline]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// One line of a sale: the product, the quantity sold, and the unit price
/// that applied at sale time.
///
/// ## Snapshot Pattern
/// The unit price is frozen at registration; the product field is a live
/// resolution (current product on rehydration, a placeholder when the id no
/// longer resolves) and does NOT re-derive the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    product: Product,
    quantity: u32,
    unit_price: Money,
}

impl SaleLine {
    /// Creates a line; the quantity must be strictly positive.
    pub fn new(product: Product, quantity: u32, unit_price: Money) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        Ok(SaleLine {
            product,
            quantity,
            unit_price,
        })
    }

    #[inline]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[inline]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price applied in this sale (frozen snapshot).
    #[inline]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Line subtotal: unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A registered sale: id, timestamp, and a non-empty ordered line list.
///
/// Immutable once constructed. Lines are exposed as a read-only view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    id: String,
    at: DateTime<Utc>,
    lines: Vec<SaleLine>,
}

impl Sale {
    /// Fresh-creation constructor: generates the id and timestamp.
    ///
    /// Only the registration protocol calls this, after stock validation
    /// has passed and decrements have been applied.
    pub fn compose(lines: Vec<SaleLine>) -> CoreResult<Self> {
        Sale::build(format!("S-{}", Uuid::new_v4()), Utc::now(), lines)
    }

    /// Rehydration constructor: accepts the stored id and timestamp.
    pub fn rehydrate(
        id: impl Into<String>,
        at: DateTime<Utc>,
        lines: Vec<SaleLine>,
    ) -> CoreResult<Self> {
        Sale::build(id.into(), at, lines)
    }

    fn build(id: String, at: DateTime<Utc>, lines: Vec<SaleLine>) -> CoreResult<Self> {
        validate_id("sale id", &id)?;
        if lines.is_empty() {
            return Err(CoreError::EmptySale);
        }
        Ok(Sale { id, at, lines })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Read-only view of the sale lines, in registration order.
    #[inline]
    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Sale total: sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(SaleLine::subtotal).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Unit;

    fn line(id: &str, qty: u32, price_cents: i64) -> SaleLine {
        let product =
            Product::simple(id, id, 0, 0, Unit::Piece, Money::from_cents(price_cents)).unwrap();
        SaleLine::new(product, qty, Money::from_cents(price_cents)).unwrap()
    }

    #[test]
    fn test_request_validation() {
        assert!(SaleRequest::new("BREAD", 3).is_ok());
        assert!(SaleRequest::new("", 3).is_err());
        assert!(SaleRequest::new("BREAD", 0).is_err());
    }

    #[test]
    fn test_line_subtotal() {
        let l = line("BREAD", 3, 150);
        assert_eq!(l.subtotal().cents(), 450);
    }

    #[test]
    fn test_line_rejects_zero_quantity() {
        let product = Product::simple("X", "x", 0, 0, Unit::Piece, Money::zero()).unwrap();
        assert!(SaleLine::new(product, 0, Money::zero()).is_err());
    }

    #[test]
    fn test_compose_generates_identity() {
        let sale = Sale::compose(vec![line("BREAD", 3, 150)]).unwrap();
        assert!(sale.id().starts_with("S-"));
        assert_eq!(sale.lines().len(), 1);
    }

    #[test]
    fn test_compose_rejects_empty() {
        assert!(matches!(Sale::compose(vec![]), Err(CoreError::EmptySale)));
    }

    #[test]
    fn test_rehydrate_keeps_identity_and_rejects_empty() {
        let at = Utc::now();
        let sale = Sale::rehydrate("S-42", at, vec![line("BREAD", 1, 150)]).unwrap();
        assert_eq!(sale.id(), "S-42");
        assert_eq!(sale.at(), at);

        assert!(Sale::rehydrate("S-42", at, vec![]).is_err());
    }

    #[test]
    fn test_total_sums_lines() {
        let sale =
            Sale::compose(vec![line("BREAD", 3, 150), line("CHEESE", 2, 800)]).unwrap();
        assert_eq!(sale.total().cents(), 450 + 1600);
    }
}

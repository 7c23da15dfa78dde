//! # Product Model
//!
//! The polymorphic product abstraction: simple products with their own stock
//! counter and unit cost, and bundles whose price and availability derive
//! from referenced component products.
//!
//! ## Variant Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Product                                       │
//! │                                                                         │
//! │  common: id, name, stock_current, stock_minimum                        │
//! │                                                                         │
//! │  ProductKind::Simple            ProductKind::Bundle                    │
//! │  ┌───────────────────┐          ┌────────────────────────────┐         │
//! │  │ unit: Unit        │          │ components:                │         │
//! │  │ cost: Money       │          │   [(product_id, qty > 0)]  │         │
//! │  │ price = cost      │          │ price/availability derive  │         │
//! │  └───────────────────┘          │ recursively (see Catalog)  │         │
//! │                                 └────────────────────────────┘         │
//! │                                                                         │
//! │  Bundles are constructed with stock 0/0 and keep it: they hold no      │
//! │  stock of their own. Components reference products BY ID and are       │
//! │  re-resolved against the live catalog, never deep-copied.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_cost, validate_id, validate_name, validate_quantity};

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit of measure for a simple product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    Piece,
    Kilogram,
    Liter,
}

impl Unit {
    /// Stable storage token for this unit.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "PIECE",
            Unit::Kilogram => "KILOGRAM",
            Unit::Liter => "LITER",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PIECE" => Ok(Unit::Piece),
            "KILOGRAM" => Ok(Unit::Kilogram),
            "LITER" => Ok(Unit::Liter),
            other => Err(ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("unknown unit '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Bundle Component
// =============================================================================

/// One component of a bundle: a product reference and how many units of it
/// the bundle needs.
///
/// Immutable value; the reference is an id, resolved against the live
/// catalog whenever price or stock math needs the actual product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleComponent {
    product_id: String,
    quantity: u32,
}

impl BundleComponent {
    /// Creates a component, validating the reference and quantity.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Result<Self, ValidationError> {
        let product_id = product_id.into();
        validate_id("component product id", &product_id)?;
        validate_quantity(quantity)?;
        Ok(BundleComponent {
            product_id,
            quantity,
        })
    }

    /// The referenced product's id.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Units of the referenced product per one bundle.
    #[inline]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Product
// =============================================================================

/// Kind-specific payload of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// A product with its own stock counter and unit cost.
    Simple { unit: Unit, cost: Money },
    /// A product composed of other products; holds no stock of its own.
    Bundle { components: Vec<BundleComponent> },
}

/// A product tracked by the inventory.
///
/// Fields are private; reads go through accessors and every mutation goes
/// through a named method that enforces the invariants (stock never
/// negative, names never blank).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    name: String,
    stock_current: u32,
    stock_minimum: u32,
    kind: ProductKind,
}

impl Product {
    /// Creates a simple product.
    pub fn simple(
        id: impl Into<String>,
        name: impl Into<String>,
        stock_current: u32,
        stock_minimum: u32,
        unit: Unit,
        cost: Money,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();
        validate_id("product id", &id)?;
        validate_name("product name", &name)?;
        validate_cost(cost)?;
        Ok(Product {
            id,
            name,
            stock_current,
            stock_minimum,
            kind: ProductKind::Simple { unit, cost },
        })
    }

    /// Creates a bundle.
    ///
    /// Bundles have no stock of their own: both stock fields are zero and
    /// stay zero. Availability is derived from the components.
    pub fn bundle(
        id: impl Into<String>,
        name: impl Into<String>,
        components: Vec<BundleComponent>,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();
        validate_id("product id", &id)?;
        validate_name("product name", &name)?;
        Ok(Product {
            id,
            name,
            stock_current: 0,
            stock_minimum: 0,
            kind: ProductKind::Bundle { components },
        })
    }

    /// Creates a zeroed stand-in for a product id that no longer resolves.
    ///
    /// Used by the hydration layer so that reads of historical sales and
    /// orders never fail outright when the referenced product was deleted.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Product {
            id: id.into(),
            name: "n/a".to_string(),
            stock_current: 0,
            stock_minimum: 0,
            kind: ProductKind::Simple {
                unit: Unit::Piece,
                cost: Money::zero(),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn stock_current(&self) -> u32 {
        self.stock_current
    }

    #[inline]
    pub const fn stock_minimum(&self) -> u32 {
        self.stock_minimum
    }

    #[inline]
    pub const fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// True for bundle products.
    #[inline]
    pub const fn is_bundle(&self) -> bool {
        matches!(self.kind, ProductKind::Bundle { .. })
    }

    /// The product's own unit cost, for simple products.
    ///
    /// Bundle prices derive from components and need the catalog; see
    /// `Catalog::price_of`.
    pub fn unit_cost(&self) -> Option<Money> {
        match &self.kind {
            ProductKind::Simple { cost, .. } => Some(*cost),
            ProductKind::Bundle { .. } => None,
        }
    }

    /// Read-only view of the bundle components, for bundle products.
    pub fn components(&self) -> Option<&[BundleComponent]> {
        match &self.kind {
            ProductKind::Bundle { components } => Some(components),
            ProductKind::Simple { .. } => None,
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Renames the product.
    pub fn set_name(&mut self, name: impl Into<String>) -> CoreResult<()> {
        let name = name.into();
        validate_name("product name", &name)?;
        self.name = name;
        Ok(())
    }

    /// Changes the minimum stock threshold used by auto-replenishment.
    pub fn set_stock_minimum(&mut self, minimum: u32) {
        self.stock_minimum = minimum;
    }

    /// Deducts from this product's own stock counter.
    ///
    /// Fails with `InsufficientStock` and leaves the counter untouched when
    /// `quantity` exceeds the current stock. Note this operates on the
    /// product's OWN counter only; deducting a bundle propagates through its
    /// components and is the catalog's job.
    pub fn deduct(&mut self, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;
        if self.stock_current < quantity {
            return Err(CoreError::insufficient_stock(
                self.id.as_str(),
                quantity as u64,
                self.stock_current as u64,
            ));
        }
        self.stock_current -= quantity;
        Ok(())
    }

    /// Adds to this product's own stock counter (goods received).
    pub fn restock(&mut self, quantity: u32) -> CoreResult<()> {
        validate_quantity(quantity)?;
        self.stock_current += quantity;
        Ok(())
    }

    /// True when current stock has fallen below the configured minimum.
    #[inline]
    pub const fn below_minimum(&self) -> bool {
        self.stock_current < self.stock_minimum
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

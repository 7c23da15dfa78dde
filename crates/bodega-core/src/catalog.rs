//! # Catalog
//!
//! Pure in-memory product set with the recursive price, availability, and
//! stock-deduction math. The storage layer loads the product list, the
//! catalog does the arithmetic, and callers persist whatever changed.
//!
//! ## Two-Phase Deduction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How a Deduction Avoids Partial Mutation                    │
//! │                                                                         │
//! │  demands: [(COMBO, 2), (BREAD, 1)]                                     │
//! │       │                                                                 │
//! │       ▼  requirements() - recurse bundles down to simple products,     │
//! │          merging into ONE map (running totals across all demands)      │
//! │                                                                         │
//! │  { BREAD: 5, CHEESE: 2 }      (COMBO = 2×BREAD + 1×CHEESE)             │
//! │       │                                                                 │
//! │       ▼  check() - compare every entry against current stock;          │
//! │          first shortfall fails the WHOLE operation, nothing mutated    │
//! │       │                                                                 │
//! │       ▼  apply() - debit every entry; only reached when check passed   │
//! │                                                                         │
//! │  The merged map is what makes two sale lines for the same product a    │
//! │  single running total instead of two independent checks.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::product::{Product, ProductKind};
use crate::validation::validate_quantity;

/// Merged per-product stock requirements: simple product id → total units.
///
/// Ordered map so that error reporting and persistence of debited products
/// are deterministic.
pub type Requirements = BTreeMap<String, u64>;

// =============================================================================
// Catalog
// =============================================================================

/// An in-memory product set, keyed by id, preserving store order.
///
/// The catalog is a transient reconstruction: it has no back-reference to
/// storage. Mutations happen here first, then the caller persists the
/// touched products through the entity store.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from a product list (typically `ProductStore::list`).
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id() == id)
    }

    /// Read-only view of all products, in store order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Consumes the catalog, returning the (possibly mutated) products.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Current price of a product.
    ///
    /// Simple products price at their unit cost; bundles price at the sum of
    /// component prices times component quantities, recursively.
    pub fn price_of(&self, id: &str) -> CoreResult<Money> {
        let mut trail = Vec::new();
        self.price_walk(id, &mut trail)
    }

    fn price_walk(&self, id: &str, trail: &mut Vec<String>) -> CoreResult<Money> {
        let product = self.resolve(id, trail)?;
        let price = match product.kind() {
            ProductKind::Simple { cost, .. } => *cost,
            ProductKind::Bundle { components } => {
                trail.push(id.to_string());
                let mut total = Money::zero();
                for component in components {
                    let unit = self.price_walk(component.product_id(), trail)?;
                    total += unit.multiply_quantity(component.quantity());
                }
                trail.pop();
                total
            }
        };
        Ok(price)
    }

    /// How many units of a product could be sold right now.
    ///
    /// Simple products report their own stock. Bundles report the minimum
    /// over components of `available(component) / quantity`, recursively; a
    /// bundle with no components reports zero.
    pub fn available(&self, id: &str) -> CoreResult<u64> {
        let mut trail = Vec::new();
        self.available_walk(id, &mut trail)
    }

    fn available_walk(&self, id: &str, trail: &mut Vec<String>) -> CoreResult<u64> {
        let product = self.resolve(id, trail)?;
        let available = match product.kind() {
            ProductKind::Simple { .. } => product.stock_current() as u64,
            ProductKind::Bundle { components } => {
                trail.push(id.to_string());
                let mut sellable = if components.is_empty() { 0 } else { u64::MAX };
                for component in components {
                    let per = self.available_walk(component.product_id(), trail)?
                        / component.quantity() as u64;
                    sellable = sellable.min(per);
                }
                trail.pop();
                sellable
            }
        };
        Ok(available)
    }

    // -------------------------------------------------------------------------
    // Two-phase deduction
    // -------------------------------------------------------------------------

    /// Expands a list of `(product_id, quantity)` demands into one merged
    /// map of simple-product requirements.
    ///
    /// Bundles are recursed down to the simple products that actually hold
    /// stock; quantities for the same product are summed across ALL demands,
    /// so two demands for the same product are validated together.
    pub fn requirements(&self, demands: &[(&str, u32)]) -> CoreResult<Requirements> {
        let mut needs = Requirements::new();
        for (id, quantity) in demands {
            validate_quantity(*quantity)?;
            let mut trail = Vec::new();
            self.require_walk(id, *quantity as u64, &mut trail, &mut needs)?;
        }
        Ok(needs)
    }

    fn require_walk(
        &self,
        id: &str,
        quantity: u64,
        trail: &mut Vec<String>,
        needs: &mut Requirements,
    ) -> CoreResult<()> {
        let product = self.resolve(id, trail)?;
        match product.kind() {
            ProductKind::Simple { .. } => {
                *needs.entry(product.id().to_string()).or_insert(0) += quantity;
            }
            ProductKind::Bundle { components } => {
                trail.push(id.to_string());
                for component in components {
                    self.require_walk(
                        component.product_id(),
                        component.quantity() as u64 * quantity,
                        trail,
                        needs,
                    )?;
                }
                trail.pop();
            }
        }
        Ok(())
    }

    /// Verifies that every requirement is covered by current stock.
    ///
    /// Fails with `InsufficientStock` naming the first shortfall; nothing is
    /// mutated by this phase.
    pub fn check(&self, needs: &Requirements) -> CoreResult<()> {
        for (id, required) in needs {
            let product = self
                .get(id)
                .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
            let available = product.stock_current() as u64;
            if available < *required {
                return Err(CoreError::insufficient_stock(id.as_str(), *required, available));
            }
        }
        Ok(())
    }

    /// Debits every requirement from stock. Call only after `check` passed.
    pub fn apply(&mut self, needs: &Requirements) -> CoreResult<()> {
        for (id, required) in needs {
            let product = self
                .get_mut(id)
                .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
            let available = product.stock_current() as u64;
            if available < *required {
                return Err(CoreError::insufficient_stock(id.as_str(), *required, available));
            }
            product.deduct(*required as u32)?;
        }
        Ok(())
    }

    /// Deducts `quantity` units of one product, propagating through bundle
    /// components, all-or-nothing.
    ///
    /// This is the standalone two-phase contract: pre-validate every
    /// transitive component, and only then mutate. On any shortfall the
    /// whole catalog is left exactly as it was.
    pub fn deduct(&mut self, id: &str, quantity: u32) -> CoreResult<()> {
        let needs = self.requirements(&[(id, quantity)])?;
        self.check(&needs)?;
        self.apply(&needs)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Resolves an id, rejecting unknown products and cyclic bundle chains.
    fn resolve(&self, id: &str, trail: &[String]) -> CoreResult<&Product> {
        if trail.iter().any(|seen| seen == id) {
            return Err(CoreError::Validation(ValidationError::InvalidFormat {
                field: "components".to_string(),
                reason: format!("cyclic bundle reference involving '{id}'"),
            }));
        }
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

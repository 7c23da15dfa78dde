//! # Product Store
//!
//! Flat-file persistence for products.
//!
//! ## File Layout (`products.csv`)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kind;id;name;stock_current;stock_minimum;unit;cost_cents;components   │
//! │                                                                         │
//! │  simple;BREAD;White bread;10;5;PIECE;150;                              │
//! │  simple;CHEESE;Cheese;4;2;KILOGRAM;800;                                │
//! │  bundle;SANDWICH;Sandwich;;;;;BREAD:2|CHEESE:1                         │
//! │                                                                         │
//! │  Simple rows carry stock/unit/cost and leave components blank.         │
//! │  Bundle rows leave the stock columns blank (bundles hold no stock)     │
//! │  and serialize components as id:qty pairs joined with '|'.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows that fail to parse are skipped with a warning; the next full-file
//! rewrite drops them. This mirrors a store that keeps serving the healthy
//! records instead of refusing the whole file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bodega_core::{BundleComponent, Money, Product, ProductKind, Unit};

use crate::codec;
use crate::error::StoreResult;
use crate::repository::{ensure_file, read_records, write_all, Repository};

const FILE_HEADER: &str = "kind;id;name;stock_current;stock_minimum;unit;cost_cents;components";
const KIND_SIMPLE: &str = "simple";
const KIND_BUNDLE: &str = "bundle";

/// Rewrite store for products.
///
/// `upsert` reads the full set, drops any record with the same id, appends
/// the new one, and rewrites the complete file. Acceptable for small
/// datasets; an index-structured store could replace this without changing
/// the [`Repository`] contract.
#[derive(Debug, Clone)]
pub struct ProductStore {
    path: PathBuf,
}

impl ProductStore {
    /// Opens (creating if needed) the product store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        ensure_file(&path, FILE_HEADER)?;
        Ok(ProductStore { path })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_products(&self, products: &[Product]) -> StoreResult<()> {
        let lines: Vec<String> = products.iter().map(serialize).collect();
        write_all(&self.path, FILE_HEADER, &lines)
    }
}

impl Repository<Product> for ProductStore {
    fn list(&self) -> StoreResult<Vec<Product>> {
        let mut products = Vec::new();
        for (line_no, line) in read_records(&self.path)? {
            let fields = codec::split_fields(&line);
            match parse(&fields) {
                Ok(product) => products.push(product),
                Err(reason) => {
                    warn!(file = "products.csv", line = line_no, %reason, "skipping corrupt product row");
                }
            }
        }
        Ok(products)
    }

    fn find(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.list()?.into_iter().find(|p| p.id() == id))
    }

    fn upsert(&self, entity: &Product) -> StoreResult<()> {
        debug!(id = %entity.id(), "upserting product");
        let mut products = self.list()?;
        products.retain(|p| p.id() != entity.id());
        products.push(entity.clone());
        self.write_products(&products)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut products = self.list()?;
        let before = products.len();
        products.retain(|p| p.id() != id);
        if products.len() != before {
            debug!(%id, "deleting product");
            self.write_products(&products)?;
        }
        Ok(())
    }
}

// =============================================================================
// Row (De)serialization
// =============================================================================

fn serialize(product: &Product) -> String {
    match product.kind() {
        ProductKind::Simple { unit, cost } => codec::join_fields(&[
            KIND_SIMPLE,
            product.id(),
            product.name(),
            &product.stock_current().to_string(),
            &product.stock_minimum().to_string(),
            unit.as_str(),
            &cost.cents().to_string(),
            "",
        ]),
        ProductKind::Bundle { components } => {
            let joined = components
                .iter()
                .map(|c| format!("{}:{}", c.product_id(), c.quantity()))
                .collect::<Vec<_>>()
                .join("|");
            codec::join_fields(&[
                KIND_BUNDLE,
                product.id(),
                product.name(),
                "",
                "",
                "",
                "",
                &joined,
            ])
        }
    }
}

fn parse(fields: &[String]) -> Result<Product, String> {
    let kind = fields.first().map(String::as_str).unwrap_or_default();
    match kind {
        KIND_SIMPLE => {
            if fields.len() < 7 {
                return Err(format!("expected 7+ fields, got {}", fields.len()));
            }
            let stock_current: u32 = fields[3]
                .parse()
                .map_err(|_| format!("bad stock_current '{}'", fields[3]))?;
            let stock_minimum: u32 = fields[4]
                .parse()
                .map_err(|_| format!("bad stock_minimum '{}'", fields[4]))?;
            let unit: Unit = fields[5]
                .parse()
                .map_err(|_| format!("bad unit '{}'", fields[5]))?;
            let cost_cents: i64 = fields[6]
                .parse()
                .map_err(|_| format!("bad cost_cents '{}'", fields[6]))?;
            Product::simple(
                fields[1].clone(),
                fields[2].clone(),
                stock_current,
                stock_minimum,
                unit,
                Money::from_cents(cost_cents),
            )
            .map_err(|e| e.to_string())
        }
        KIND_BUNDLE => {
            if fields.len() < 8 {
                return Err(format!("expected 8 fields, got {}", fields.len()));
            }
            let mut components = Vec::new();
            for pair in fields[7].split('|').filter(|p| !p.is_empty()) {
                let (product_id, qty) = pair
                    .split_once(':')
                    .ok_or_else(|| format!("bad component '{pair}'"))?;
                let quantity: u32 = qty
                    .parse()
                    .map_err(|_| format!("bad component quantity '{qty}'"))?;
                components.push(
                    BundleComponent::new(product_id, quantity).map_err(|e| e.to_string())?,
                );
            }
            Product::bundle(fields[1].clone(), fields[2].clone(), components)
                .map_err(|e| e.to_string())
        }
        other => Err(format!("unknown product kind '{other}'")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> ProductStore {
        ProductStore::new(dir.path().join("products.csv")).unwrap()
    }

    fn bread(stock: u32) -> Product {
        Product::simple(
            "BREAD",
            "White bread",
            stock,
            5,
            Unit::Piece,
            Money::from_cents(150),
        )
        .unwrap()
    }

    #[test]
    fn test_new_store_writes_header() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        let content = fs::read_to_string(s.path()).unwrap();
        assert!(content.starts_with(FILE_HEADER));
        assert!(s.list().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_simple_and_bundle() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.upsert(&bread(10)).unwrap();
        let sandwich = Product::bundle(
            "SANDWICH",
            "Sandwich",
            vec![
                BundleComponent::new("BREAD", 2).unwrap(),
                BundleComponent::new("CHEESE", 1).unwrap(),
            ],
        )
        .unwrap();
        s.upsert(&sandwich).unwrap();

        let listed = s.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], bread(10));
        assert_eq!(listed[1], sandwich);
    }

    #[test]
    fn test_upsert_is_idempotent_per_id() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        for stock in [10, 7, 3] {
            s.upsert(&bread(stock)).unwrap();
        }
        let listed = s.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].stock_current(), 3); // latest value won
    }

    #[test]
    fn test_find_and_delete() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.upsert(&bread(10)).unwrap();

        assert!(s.find("BREAD").unwrap().is_some());
        assert!(s.find("NOPE").unwrap().is_none());

        s.delete("BREAD").unwrap();
        assert!(s.find("BREAD").unwrap().is_none());

        // deleting a missing id is a no-op
        s.delete("BREAD").unwrap();
    }

    #[test]
    fn test_escaped_fields_survive() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        let odd = Product::simple(
            "ODD",
            "name; with \\ delimiter\nand newline",
            1,
            0,
            Unit::Liter,
            Money::from_cents(99),
        )
        .unwrap();
        s.upsert(&odd).unwrap();
        assert_eq!(s.find("ODD").unwrap().unwrap(), odd);
    }

    #[test]
    fn test_corrupt_row_is_skipped() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.upsert(&bread(10)).unwrap();
        // append garbage by hand
        let mut content = fs::read_to_string(s.path()).unwrap();
        content.push_str("simple;BAD;Bad row;not-a-number;0;PIECE;1;\n");
        content.push_str("mystery;row\n");
        fs::write(s.path(), content).unwrap();

        let listed = s.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), "BREAD");
    }
}

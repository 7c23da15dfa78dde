//! # Product ↔ Supplier Association Map
//!
//! A side mapping `product_id → supplier_id`, independently persisted and
//! independently lifecycle-managed - it is NOT embedded in the product
//! records. The auto-replenishment trigger consults it to decide which
//! supplier a shortfall order goes to.
//!
//! Loading is best-effort by design: a missing or unreadable file degrades
//! to an empty map with a warning instead of failing the whole system. This
//! is the single place a storage error is swallowed. Writes are not
//! best-effort; `associate`/`dissociate` persist the full map and surface
//! failures.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bodega_core::{validation::validate_id, CoreError};

use crate::codec;
use crate::error::StoreResult;

const FILE_HEADER: &str = "product_id;supplier_id";

/// In-memory association map backed by `product_suppliers.csv`.
///
/// Re-associating a product overwrites the previous supplier
/// (last-write-wins).
#[derive(Debug, Clone)]
pub struct SupplierMap {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl SupplierMap {
    /// Loads the map from `path`, best-effort.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match Self::read(&path) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %path.display(), %err, "supplier map unreadable, starting empty");
                HashMap::new()
            }
        };
        debug!(entries = map.len(), "supplier map loaded");
        SupplierMap { path, map }
    }

    fn read(path: &Path) -> std::io::Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        let content = fs::read_to_string(path)?;
        for line in content.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let fields = codec::split_fields(line);
            if fields.len() >= 2 {
                let product_id = fields[0].trim();
                let supplier_id = fields[1].trim();
                if !product_id.is_empty() && !supplier_id.is_empty() {
                    map.insert(product_id.to_string(), supplier_id.to_string());
                }
            }
        }
        Ok(map)
    }

    /// The supplier configured for a product, if any.
    pub fn supplier_for(&self, product_id: &str) -> Option<&str> {
        self.map.get(product_id).map(String::as_str)
    }

    /// Associates a product with a supplier and persists the change.
    /// Overwrites any previous association for the product.
    pub fn associate(&mut self, product_id: &str, supplier_id: &str) -> StoreResult<()> {
        validate_id("product id", product_id).map_err(CoreError::from)?;
        validate_id("supplier id", supplier_id).map_err(CoreError::from)?;
        self.map
            .insert(product_id.to_string(), supplier_id.to_string());
        self.persist()
    }

    /// Removes any association for the product and persists the change.
    /// No-op (and no write) when the product was not associated.
    pub fn dissociate(&mut self, product_id: &str) -> StoreResult<()> {
        if self.map.remove(product_id).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Number of stored associations.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no association is stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn persist(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut entries: Vec<(&String, &String)> = self.map.iter().collect();
        entries.sort(); // stable file output
        let mut content = String::from(FILE_HEADER);
        content.push('\n');
        for (product_id, supplier_id) in entries {
            content.push_str(&codec::join_fields(&[product_id, supplier_id]));
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let map = SupplierMap::load(dir.path().join("nope.csv"));
        assert!(map.is_empty());
        assert_eq!(map.supplier_for("BREAD"), None);
    }

    #[test]
    fn test_associate_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("product_suppliers.csv");

        let mut map = SupplierMap::load(&path);
        map.associate("BREAD", "SUP-1").unwrap();
        map.associate("CHEESE", "SUP-2").unwrap();

        let reloaded = SupplierMap::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.supplier_for("BREAD"), Some("SUP-1"));
        assert_eq!(reloaded.supplier_for("CHEESE"), Some("SUP-2"));
    }

    #[test]
    fn test_reassociation_is_last_write_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("product_suppliers.csv");

        let mut map = SupplierMap::load(&path);
        map.associate("BREAD", "SUP-1").unwrap();
        map.associate("BREAD", "SUP-2").unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.supplier_for("BREAD"), Some("SUP-2"));
        assert_eq!(SupplierMap::load(&path).supplier_for("BREAD"), Some("SUP-2"));
    }

    #[test]
    fn test_dissociate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("product_suppliers.csv");

        let mut map = SupplierMap::load(&path);
        map.associate("BREAD", "SUP-1").unwrap();
        map.dissociate("BREAD").unwrap();
        map.dissociate("NEVER-THERE").unwrap(); // no-op

        assert!(map.is_empty());
        assert!(SupplierMap::load(&path).is_empty());
    }

    #[test]
    fn test_associate_validates_ids() {
        let dir = tempdir().unwrap();
        let mut map = SupplierMap::load(dir.path().join("m.csv"));
        assert!(map.associate("", "SUP-1").is_err());
        assert!(map.associate("BREAD", "  ").is_err());
    }
}

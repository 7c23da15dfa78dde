//! # Supplier Store
//!
//! Flat-file persistence for suppliers: `id;name;contact`, one record per
//! line, full-file rewrite on change.
//!
//! Unlike the product store, a row that fails to parse here surfaces as a
//! [`StoreError::Corrupt`](crate::StoreError::Corrupt) instead of being
//! skipped: supplier data is small, hand-edited, and a silent skip would
//! quietly orphan every order pointing at the supplier.

use std::path::{Path, PathBuf};

use tracing::debug;

use bodega_core::Supplier;

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::repository::{ensure_file, read_records, write_all, Repository};

const FILE_HEADER: &str = "id;name;contact";
const FILE_NAME: &str = "suppliers.csv";

/// Rewrite store for suppliers.
#[derive(Debug, Clone)]
pub struct SupplierStore {
    path: PathBuf,
}

impl SupplierStore {
    /// Opens (creating if needed) the supplier store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        ensure_file(&path, FILE_HEADER)?;
        Ok(SupplierStore { path })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_suppliers(&self, suppliers: &[Supplier]) -> StoreResult<()> {
        let lines: Vec<String> = suppliers
            .iter()
            .map(|s| codec::join_fields(&[s.id(), s.name(), s.contact()]))
            .collect();
        write_all(&self.path, FILE_HEADER, &lines)
    }
}

impl Repository<Supplier> for SupplierStore {
    fn list(&self) -> StoreResult<Vec<Supplier>> {
        let mut suppliers = Vec::new();
        for (line_no, line) in read_records(&self.path)? {
            let fields = codec::split_fields(&line);
            if fields.len() < 3 {
                return Err(StoreError::corrupt(
                    FILE_NAME,
                    line_no,
                    format!("expected 3 fields, got {}", fields.len()),
                ));
            }
            let supplier = Supplier::new(&fields[0], &fields[1], &fields[2])
                .map_err(|e| StoreError::corrupt(FILE_NAME, line_no, e.to_string()))?;
            suppliers.push(supplier);
        }
        Ok(suppliers)
    }

    fn find(&self, id: &str) -> StoreResult<Option<Supplier>> {
        Ok(self.list()?.into_iter().find(|s| s.id() == id))
    }

    fn upsert(&self, entity: &Supplier) -> StoreResult<()> {
        debug!(id = %entity.id(), "upserting supplier");
        let mut suppliers = self.list()?;
        suppliers.retain(|s| s.id() != entity.id());
        suppliers.push(entity.clone());
        self.write_suppliers(&suppliers)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut suppliers = self.list()?;
        let before = suppliers.len();
        suppliers.retain(|s| s.id() != id);
        if suppliers.len() != before {
            debug!(%id, "deleting supplier");
            self.write_suppliers(&suppliers)?;
        }
        Ok(())
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

    fn store(dir: &tempfile::TempDir) -> SupplierStore {
        SupplierStore::new(dir.path().join("suppliers.csv")).unwrap()
    }

    fn mill() -> Supplier {
        Supplier::new("SUP-1", "Mill & Co", "mill@example.com").unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.upsert(&mill()).unwrap();
        assert_eq!(s.find("SUP-1").unwrap().unwrap(), mill());
    }

    #[test]
    fn test_upsert_replaces() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.upsert(&mill()).unwrap();
        let renamed = Supplier::new("SUP-1", "Mill Brothers", "mill@example.com").unwrap();
        s.upsert(&renamed).unwrap();

        let listed = s.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name(), "Mill Brothers");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        s.delete("SUP-9").unwrap();
    }

    #[test]
    fn test_corrupt_row_is_an_error() {
        let dir = tempdir().unwrap();
        let s = store(&dir);
        let mut content = fs::read_to_string(s.path()).unwrap();
        content.push_str("SUP-2;only-two-fields\n");
        fs::write(s.path(), content).unwrap();

        assert!(matches!(s.list(), Err(StoreError::Corrupt { line: 2, .. })));
    }
}

//! # Repository Module
//!
//! Flat-file store implementations, one per entity kind.
//!
//! ## Store Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Two Families of Stores                              │
//! │                                                                         │
//! │  REWRITE STORES (products, suppliers)                                  │
//! │  ├── one file, header + one record per line                            │
//! │  ├── upsert = read all → drop same id → append → rewrite whole file    │
//! │  └── delete = rewrite without the record (no-op when absent)           │
//! │                                                                         │
//! │  APPEND-ONLY STORES (sales, orders)                                    │
//! │  ├── header file + detail file per entity kind                         │
//! │  ├── details are only ever appended, never rewritten                   │
//! │  ├── delete is NOT supported and fails distinguishably                 │
//! │  └── reads return raw records; reconciliation into complete objects    │
//! │      happens above the store (service::hydrate)                        │
//! │                                                                         │
//! │  Neither family takes locks: writes are not atomic across files and    │
//! │  concurrent writers are NOT safe. A single logical actor drives all    │
//! │  mutations; anything else needs external serialization.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Stores
//!
//! - [`ProductStore`](product::ProductStore) - products (rewrite)
//! - [`SupplierStore`](supplier::SupplierStore) - suppliers (rewrite)
//! - [`SaleStore`](sale::SaleStore) - sale headers + lines (append-only)
//! - [`OrderStore`](order::OrderStore) - order headers + items

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::error::StoreResult;

pub mod order;
pub mod product;
pub mod sale;
pub mod supplier;

// =============================================================================
// Generic Repository Contract
// =============================================================================

/// Generic per-entity-kind CRUD over the backing files.
///
/// ## Contract
/// - `upsert` is idempotent per id: calling it twice with the same id
///   replaces, never duplicates, the stored record. (Append-only stores
///   document their variant semantics where they differ.)
/// - `delete` on a non-existent id is a no-op; append-only stores instead
///   fail with [`StoreError::Unsupported`](crate::StoreError::Unsupported).
/// - Any I/O failure surfaces as a storage error; a partially written file
///   after a failed write is an accepted risk, not hidden.
pub trait Repository<T> {
    /// Returns all stored entities, in file order.
    fn list(&self) -> StoreResult<Vec<T>>;

    /// Looks up one entity by id.
    fn find(&self, id: &str) -> StoreResult<Option<T>>;

    /// Inserts or replaces an entity.
    fn upsert(&self, entity: &T) -> StoreResult<()>;

    /// Removes an entity by id.
    fn delete(&self, id: &str) -> StoreResult<()>;
}

// =============================================================================
// Shared File Plumbing
// =============================================================================

/// Ensures the parent directory exists and the file starts with its header.
pub(crate) fn ensure_file(path: &Path, header: &str) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs::write(path, format!("{header}\n"))?;
    }
    Ok(())
}

/// Reads all data lines of a store file: header and blank lines skipped,
/// each line paired with its 1-based physical line number for diagnostics.
pub(crate) fn read_records(path: &Path) -> StoreResult<Vec<(usize, String)>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .enumerate()
        .skip(1) // header
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.to_string()))
        .collect())
}

/// Rewrites a store file completely: header plus the given record lines.
pub(crate) fn write_all(path: &Path, header: &str, lines: &[String]) -> StoreResult<()> {
    let mut content = String::with_capacity(header.len() + 1 + lines.len() * 32);
    content.push_str(header);
    content.push('\n');
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}

/// Appends one record line to a store file.
pub(crate) fn append_line(path: &Path, line: &str) -> StoreResult<()> {
    let mut file = fs::OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

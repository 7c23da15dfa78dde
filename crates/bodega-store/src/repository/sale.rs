//! # Sale Store
//!
//! Append-only persistence for sales, split across two files.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales.csv                     sale_lines.csv                           │
//! │  ─────────                     ──────────────                           │
//! │  id;at                         sale_id;product_id;quantity;             │
//! │                                unit_price_cents                         │
//! │  S-42;2026-08-06T14:03:11...   S-42;BREAD;3;150                         │
//! │  ...+00:00                     S-42;CHEESE;2;800                        │
//! │                                                                         │
//! │  Both files are append-only: registering a sale appends one header     │
//! │  row and one row per line. Nothing is ever rewritten or deleted.       │
//! │  There is no transaction across the two files - if the process dies    │
//! │  between the header write and the line writes, a header-only sale      │
//! │  remains on disk. That risk is accepted; the hydration layer skips     │
//! │  such husks with a warning.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads return raw [`SaleHeader`] / [`SaleLineRecord`] records. Turning
//! them into complete [`Sale`](bodega_core::Sale) objects - grouping lines,
//! resolving products live - is [`service::hydrate`](crate::service::hydrate)'s
//! job, so the store stays low-level and the reconciliation logic testable
//! on its own.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bodega_core::{Money, Sale};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::repository::{append_line, ensure_file, read_records, Repository};

const HEADERS_FILE: &str = "sales.csv";
const LINES_FILE: &str = "sale_lines.csv";
const HEADERS_HEADER: &str = "id;at";
const LINES_HEADER: &str = "sale_id;product_id;quantity;unit_price_cents";

// =============================================================================
// Raw Records
// =============================================================================

/// Stored sale header: id and timestamp, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleHeader {
    pub id: String,
    pub at: DateTime<Utc>,
}

/// Stored sale line: one row per line of the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineRecord {
    pub sale_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Money,
}

// =============================================================================
// Sale Store
// =============================================================================

/// Append-only store for sale headers and lines.
#[derive(Debug, Clone)]
pub struct SaleStore {
    headers: PathBuf,
    lines: PathBuf,
}

impl SaleStore {
    /// Opens (creating if needed) `sales.csv` and `sale_lines.csv` under
    /// `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let base = base_dir.as_ref();
        let headers = base.join(HEADERS_FILE);
        let lines = base.join(LINES_FILE);
        ensure_file(&headers, HEADERS_HEADER)?;
        ensure_file(&lines, LINES_HEADER)?;
        Ok(SaleStore { headers, lines })
    }

    /// Appends a complete sale: one header row plus one row per line.
    ///
    /// Appending the same sale twice duplicates it - the registration
    /// protocol writes each sale exactly once and nothing else calls this.
    pub fn append(&self, sale: &Sale) -> StoreResult<()> {
        debug!(id = %sale.id(), lines = sale.lines().len(), "appending sale");
        append_line(
            &self.headers,
            &codec::join_fields(&[sale.id(), &sale.at().to_rfc3339()]),
        )?;
        for line in sale.lines() {
            append_line(
                &self.lines,
                &codec::join_fields(&[
                    sale.id(),
                    line.product().id(),
                    &line.quantity().to_string(),
                    &line.unit_price().cents().to_string(),
                ]),
            )?;
        }
        Ok(())
    }

    /// Reads all sale headers; malformed rows are warned and skipped.
    pub fn headers(&self) -> StoreResult<Vec<SaleHeader>> {
        let mut out = Vec::new();
        for (line_no, line) in read_records(&self.headers)? {
            let fields = codec::split_fields(&line);
            if fields.len() < 2 {
                warn!(file = HEADERS_FILE, line = line_no, "skipping short sale header row");
                continue;
            }
            let at = match DateTime::parse_from_rfc3339(&fields[1]) {
                Ok(at) => at.with_timezone(&Utc),
                Err(_) => {
                    warn!(file = HEADERS_FILE, line = line_no, raw = %fields[1], "skipping sale header with bad timestamp");
                    continue;
                }
            };
            out.push(SaleHeader {
                id: fields[0].clone(),
                at,
            });
        }
        Ok(out)
    }

    /// Reads all sale line records; malformed rows are warned and skipped.
    pub fn lines(&self) -> StoreResult<Vec<SaleLineRecord>> {
        let mut out = Vec::new();
        for (line_no, line) in read_records(&self.lines)? {
            let fields = codec::split_fields(&line);
            if fields.len() < 4 {
                warn!(file = LINES_FILE, line = line_no, "skipping short sale line row");
                continue;
            }
            let quantity: u32 = match fields[2].parse() {
                Ok(q) => q,
                Err(_) => {
                    warn!(file = LINES_FILE, line = line_no, raw = %fields[2], "skipping sale line with bad quantity");
                    continue;
                }
            };
            let cents: i64 = match fields[3].parse() {
                Ok(c) => c,
                Err(_) => {
                    warn!(file = LINES_FILE, line = line_no, raw = %fields[3], "skipping sale line with bad price");
                    continue;
                }
            };
            out.push(SaleLineRecord {
                sale_id: fields[0].clone(),
                product_id: fields[1].clone(),
                quantity,
                unit_price: Money::from_cents(cents),
            });
        }
        Ok(out)
    }
}

/// Repository view over the header file.
///
/// `upsert` follows the append-only log semantics: it appends the header
/// without reading or rewriting anything, so repeated upserts of the same id
/// duplicate the row. `delete` is not supported.
impl Repository<SaleHeader> for SaleStore {
    fn list(&self) -> StoreResult<Vec<SaleHeader>> {
        self.headers()
    }

    fn find(&self, id: &str) -> StoreResult<Option<SaleHeader>> {
        Ok(self.headers()?.into_iter().find(|h| h.id == id))
    }

    fn upsert(&self, entity: &SaleHeader) -> StoreResult<()> {
        append_line(
            &self.headers,
            &codec::join_fields(&[entity.id.as_str(), &entity.at.to_rfc3339()]),
        )
    }

    fn delete(&self, _id: &str) -> StoreResult<()> {
        Err(StoreError::unsupported("SaleStore", "delete"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::{Product, SaleLine, Unit};
    use std::fs;
    use tempfile::tempdir;

    fn sale() -> Sale {
        let bread =
            Product::simple("BREAD", "White bread", 10, 5, Unit::Piece, Money::from_cents(150))
                .unwrap();
        let cheese =
            Product::simple("CHEESE", "Cheese", 4, 2, Unit::Kilogram, Money::from_cents(800))
                .unwrap();
        Sale::compose(vec![
            SaleLine::new(bread, 3, Money::from_cents(150)).unwrap(),
            SaleLine::new(cheese, 2, Money::from_cents(800)).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempdir().unwrap();
        let store = SaleStore::new(dir.path()).unwrap();
        let s = sale();
        store.append(&s).unwrap();

        let headers = store.headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].id, s.id());
        assert_eq!(headers[0].at, s.at());

        let lines = store.lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, "BREAD");
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].unit_price.cents(), 150);
        assert_eq!(lines[1].product_id, "CHEESE");
    }

    #[test]
    fn test_append_twice_duplicates() {
        let dir = tempdir().unwrap();
        let store = SaleStore::new(dir.path()).unwrap();
        let s = sale();
        store.append(&s).unwrap();
        store.append(&s).unwrap();
        assert_eq!(store.headers().unwrap().len(), 2);
        assert_eq!(store.lines().unwrap().len(), 4);
    }

    #[test]
    fn test_delete_is_unsupported() {
        let dir = tempdir().unwrap();
        let store = SaleStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.delete("S-1"),
            Err(StoreError::Unsupported { store: "SaleStore", operation: "delete" })
        ));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let store = SaleStore::new(dir.path()).unwrap();
        store.append(&sale()).unwrap();

        let headers_path = dir.path().join(HEADERS_FILE);
        let mut content = fs::read_to_string(&headers_path).unwrap();
        content.push_str("S-bad;not-a-timestamp\n");
        fs::write(&headers_path, content).unwrap();

        let lines_path = dir.path().join(LINES_FILE);
        let mut content = fs::read_to_string(&lines_path).unwrap();
        content.push_str("S-bad;BREAD;many;150\n");
        fs::write(&lines_path, content).unwrap();

        assert_eq!(store.headers().unwrap().len(), 1);
        assert_eq!(store.lines().unwrap().len(), 2);
    }
}

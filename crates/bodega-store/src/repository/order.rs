//! # Order Store
//!
//! Persistence for replenishment orders, split across two files with mixed
//! disciplines.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders.csv (rewrite-upsert)        order_items.csv (append-only)      │
//! │  ──────────────────────────         ─────────────────────────────      │
//! │  id;supplier_id;created_at;state    order_id;product_id;quantity       │
//! │  O-7;SUP-1;2026-08-06;SENT          O-7;BREAD;2                        │
//! │                                     O-7;CHEESE;1                       │
//! │                                                                         │
//! │  Headers ARE rewritten: state transitions upsert the header row in     │
//! │  place. Item rows are only ever appended; a pre-scan skips a pair      │
//! │  that is already present, and reads merge-sum duplicate rows. There    │
//! │  is no delete on either file.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads return raw [`OrderHeader`] records and `(product_id, quantity)`
//! item pairs; assembling complete orders with live supplier and product
//! objects is [`service::hydrate`](crate::service::hydrate)'s job.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bodega_core::{OrderState, PurchaseOrder};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::repository::{append_line, ensure_file, read_records, write_all, Repository};

const HEADERS_FILE: &str = "orders.csv";
const ITEMS_FILE: &str = "order_items.csv";
const HEADERS_HEADER: &str = "id;supplier_id;created_at;state";
const ITEMS_HEADER: &str = "order_id;product_id;quantity";

// =============================================================================
// Raw Records
// =============================================================================

/// Stored order header.
///
/// The send/receive stamps are in-memory lifecycle details and are not part
/// of the stored shape; only the current state is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: String,
    pub supplier_id: String,
    pub created_at: NaiveDate,
    pub state: OrderState,
}

impl From<&PurchaseOrder> for OrderHeader {
    fn from(order: &PurchaseOrder) -> Self {
        OrderHeader {
            id: order.id().to_string(),
            supplier_id: order.supplier().id().to_string(),
            created_at: order.created_at(),
            state: order.state(),
        }
    }
}

// =============================================================================
// Order Store
// =============================================================================

/// Header-rewrite, items-append-only store for replenishment orders.
#[derive(Debug, Clone)]
pub struct OrderStore {
    headers: PathBuf,
    items: PathBuf,
}

impl OrderStore {
    /// Opens (creating if needed) `orders.csv` and `order_items.csv` under
    /// `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let base = base_dir.as_ref();
        let headers = base.join(HEADERS_FILE);
        let items = base.join(ITEMS_FILE);
        ensure_file(&headers, HEADERS_HEADER)?;
        ensure_file(&items, ITEMS_HEADER)?;
        Ok(OrderStore { headers, items })
    }

    /// Reads all order headers.
    ///
    /// A row that fails to parse is a hard [`StoreError::Corrupt`] error:
    /// order state gates stock increments, so serving a guessed state would
    /// be worse than failing the read.
    pub fn headers(&self) -> StoreResult<Vec<OrderHeader>> {
        let mut out = Vec::new();
        for (line_no, line) in read_records(&self.headers)? {
            let fields = codec::split_fields(&line);
            if fields.len() < 4 {
                return Err(StoreError::corrupt(
                    HEADERS_FILE,
                    line_no,
                    format!("expected 4 fields, got {}", fields.len()),
                ));
            }
            let created_at: NaiveDate = fields[2]
                .parse()
                .map_err(|_| {
                    StoreError::corrupt(HEADERS_FILE, line_no, format!("bad date '{}'", fields[2]))
                })?;
            let state: OrderState = fields[3]
                .parse()
                .map_err(|e: bodega_core::ValidationError| {
                    StoreError::corrupt(HEADERS_FILE, line_no, e.to_string())
                })?;
            out.push(OrderHeader {
                id: fields[0].clone(),
                supplier_id: fields[1].clone(),
                created_at,
                state,
            });
        }
        Ok(out)
    }

    /// Appends one item row, unless the `(order, product)` pair is already
    /// stored.
    ///
    /// The pre-scan makes re-adding the same pair a no-op rather than a
    /// duplicate row. Known limitation inherited from the format: when an
    /// in-memory order merges quantities for a repeated add, the file keeps
    /// the first stored quantity - reads merge duplicate ROWS, but a skipped
    /// append is simply not there to merge.
    pub fn append_item(&self, order_id: &str, product_id: &str, quantity: u32) -> StoreResult<()> {
        for (_, line) in read_records(&self.items)? {
            let fields = codec::split_fields(&line);
            if fields.len() >= 2 && fields[0] == order_id && fields[1] == product_id {
                debug!(%order_id, %product_id, "item pair already stored, skipping append");
                return Ok(());
            }
        }
        debug!(%order_id, %product_id, %quantity, "appending order item");
        append_line(
            &self.items,
            &codec::join_fields(&[order_id, product_id, &quantity.to_string()]),
        )
    }

    /// Reads the item pairs of one order, in insertion order, merge-summing
    /// any duplicate `(order, product)` rows.
    pub fn items_for(&self, order_id: &str) -> StoreResult<Vec<(String, u32)>> {
        let mut out: Vec<(String, u32)> = Vec::new();
        for (line_no, line) in read_records(&self.items)? {
            let fields = codec::split_fields(&line);
            if fields.len() < 3 {
                return Err(StoreError::corrupt(
                    ITEMS_FILE,
                    line_no,
                    format!("expected 3 fields, got {}", fields.len()),
                ));
            }
            if fields[0] != order_id {
                continue;
            }
            let quantity: u32 = fields[2].parse().map_err(|_| {
                StoreError::corrupt(ITEMS_FILE, line_no, format!("bad quantity '{}'", fields[2]))
            })?;
            match out.iter_mut().find(|(pid, _)| pid == &fields[1]) {
                Some((_, total)) => *total += quantity,
                None => out.push((fields[1].clone(), quantity)),
            }
        }
        Ok(out)
    }

    fn write_headers(&self, headers: &[OrderHeader]) -> StoreResult<()> {
        let lines: Vec<String> = headers
            .iter()
            .map(|h| {
                codec::join_fields(&[
                    h.id.as_str(),
                    h.supplier_id.as_str(),
                    &h.created_at.to_string(),
                    h.state.as_str(),
                ])
            })
            .collect();
        write_all(&self.headers, HEADERS_HEADER, &lines)
    }
}

/// Repository view over the header file.
///
/// `upsert` rewrites the header row in place (or appends it when new) -
/// this is how state transitions are persisted. `delete` is not supported:
/// orders are history, and removing one would strand its item rows.
impl Repository<OrderHeader> for OrderStore {
    fn list(&self) -> StoreResult<Vec<OrderHeader>> {
        self.headers()
    }

    fn find(&self, id: &str) -> StoreResult<Option<OrderHeader>> {
        Ok(self.headers()?.into_iter().find(|h| h.id == id))
    }

    fn upsert(&self, entity: &OrderHeader) -> StoreResult<()> {
        debug!(id = %entity.id, state = %entity.state, "upserting order header");
        let mut headers = self.headers()?;
        match headers.iter_mut().find(|h| h.id == entity.id) {
            Some(existing) => *existing = entity.clone(),
            None => headers.push(entity.clone()),
        }
        self.write_headers(&headers)
    }

    fn delete(&self, _id: &str) -> StoreResult<()> {
        Err(StoreError::unsupported("OrderStore", "delete"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

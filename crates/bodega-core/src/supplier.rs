//! # Supplier Model
//!
//! Immutable supplier value: id, display name, contact information.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::validation::{validate_id, validate_name};

/// A supplier replenishment orders are addressed to.
///
/// Immutable once constructed; changing a supplier means upserting a new
/// value with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: String,
    name: String,
    contact: String,
}

impl Supplier {
    /// Creates a supplier; all three fields must be non-blank.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();
        let contact = contact.into();
        validate_id("supplier id", &id)?;
        validate_name("supplier name", &name)?;
        validate_name("supplier contact", &contact)?;
        Ok(Supplier { id, name, contact })
    }

    /// Stand-in for a supplier id that no longer resolves, used by the
    /// hydration layer so order reads never fail outright.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Supplier {
            id: id.into(),
            name: "n/a".to_string(),
            contact: "n/a".to_string(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn contact(&self) -> &str {
        &self.contact
    }
}

//! Resource identifiers and their display form.
//!
//! The engine treats a primary key as opaque bytes. [`format_id`] turns it
//! into the stable string used inside failure labels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Raw byte representation of a resource's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Vec<u8>);

impl RecordId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RecordId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RecordId {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id.as_bytes().to_vec())
    }
}

/// Integer keys are encoded big-endian so the hex form sorts numerically.
impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_be_bytes().to_vec())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Identifiable
// ---------------------------------------------------------------------------

/// Structural identity of a resource: its type name and primary key.
pub trait Identifiable {
    /// Unqualified type name, e.g. `"User"`.
    fn type_name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// The assigned primary key, or `None` before the record is persisted.
    fn primary_key(&self) -> Option<RecordId> {
        None
    }
}

/// Strip the module path from [`std::any::type_name`].
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Lowercase hex of the identifier bytes; empty string for an absent id.
pub fn format_id(id: Option<&RecordId>) -> String {
    match id {
        Some(id) => hex::encode(id.as_bytes()),
        None => String::new(),
    }
}

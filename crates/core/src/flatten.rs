//! Flattens a validator outcome into leaf field errors.

use crate::struct_tags::{FieldError, ValidatorEntry};

/// Walk the top-level entries in order, expanding each aggregate into its
/// leaves. Only one level of nesting is expanded: aggregates found inside an
/// aggregate are skipped. No sorting or deduplication.
pub fn flatten(entries: Vec<ValidatorEntry>) -> Vec<FieldError> {
    let mut leaves = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ValidatorEntry::Leaf(leaf) => leaves.push(leaf),
            ValidatorEntry::Aggregate(inner) => {
                for nested in inner {
                    match nested {
                        ValidatorEntry::Leaf(leaf) => leaves.push(leaf),
                        ValidatorEntry::Aggregate(deeper) => {
                            tracing::debug!(
                                skipped = deeper.len(),
                                "Skipping validator errors nested below one level"
                            );
                        }
                    }
                }
            }
        }
    }
    leaves
}

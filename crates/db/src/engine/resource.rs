use validations_core::{Identifiable, StructValidator};

use crate::validations::Validatable;

/// A record the engine can create or update.
///
/// Struct-tag rules come from [`StructValidator`], which every
/// `validator::Validate` type already implements. Record-level rules opt in
/// through [`Resource::as_validatable`].
pub trait Resource: Identifiable + StructValidator + Send + Sync {
    /// The record's own validation method, when it defines one.
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        None
    }
}

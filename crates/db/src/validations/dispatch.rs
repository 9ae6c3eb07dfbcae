//! The validation callback run ahead of every create and update.

use serde_json::Value;
use validations_core::flatten::flatten;
use validations_core::normalize::normalize_message;
use validations_core::{StructError, ValidationFailed, ValidationFailure};

use super::SKIP_VALIDATIONS;
use crate::engine::Scope;

/// Validate the record of a whole-record write.
///
/// Does nothing for column updates, when validation is skipped, or when an
/// earlier callback already recorded an error. Otherwise runs the record's own
/// `validate` method and then its struct-tag rules, recording every failure
/// on the scope. Never aborts the write itself.
pub fn validate(scope: &mut Scope<'_>) {
    if scope.is_update_column() {
        return;
    }
    if skip_requested(scope) {
        tracing::debug!(resource = scope.type_name(), "Validation skipped");
        return;
    }
    if scope.has_error() {
        tracing::debug!(
            resource = scope.type_name(),
            "Validation not run, write already failed"
        );
        return;
    }
    let Some(record) = scope.record() else {
        return;
    };

    let before = scope.errors().len();

    if let Some(validatable) = record.as_validatable() {
        validatable.validate(scope.errors_mut());
    }

    match record.validate_struct() {
        Ok(()) => {}
        Err(StructError::Aggregate(entries)) => {
            for leaf in flatten(entries) {
                let message = normalize_message(&leaf.message, &leaf.attribute);
                let path = (!leaf.path.is_empty()).then_some(leaf.path.as_str());
                let failure =
                    ValidationFailed::field_failed(record, leaf.attribute.as_str(), message, path);
                scope.add_error(ValidationFailure::from(failure));
            }
        }
        Err(StructError::Opaque(err)) => scope.add_error(err),
    }

    let recorded = scope.errors().len() - before;
    if recorded > 0 {
        tracing::debug!(
            resource = scope.type_name(),
            operation = %scope.operation(),
            recorded,
            "Validation failed"
        );
    }
}

/// Per-write option or handle-level flag.
fn skip_requested(scope: &Scope<'_>) -> bool {
    if scope.options().skip_validation {
        return true;
    }
    match scope.handle().get(SKIP_VALIDATIONS) {
        None => false,
        Some(Value::Bool(skip)) => skip,
        Some(other) => {
            tracing::warn!(
                key = SKIP_VALIDATIONS,
                value = %other,
                "Ignoring non-boolean skip flag"
            );
            false
        }
    }
}

//! Boundary to the struct-tag validator.
//!
//! Resources describe their field rules with `#[derive(validator::Validate)]`
//! attributes. The outcome is converted into [`ValidatorEntry`] values whose
//! messages use the raw vocabulary [`crate::normalize`] rewrites.

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::BoxError;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// A single field-level error reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the rule is attached to.
    pub attribute: String,
    /// Raw, un-normalized message.
    pub message: String,
    /// Location of the owning struct, e.g. `address` or `items[2]`.
    /// Empty for top-level fields.
    pub path: String,
}

/// One entry of a validator outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorEntry {
    Leaf(FieldError),
    /// Errors of an embedded struct or list element, in the validator's order.
    Aggregate(Vec<ValidatorEntry>),
}

/// Why a struct failed validation.
#[derive(Debug, thiserror::Error)]
pub enum StructError {
    #[error("{} field validation error(s)", .0.len())]
    Aggregate(Vec<ValidatorEntry>),

    /// Anything not shaped as field errors. Recorded as-is.
    #[error("{0}")]
    Opaque(BoxError),
}

/// Runs the struct-tag rules of a resource.
///
/// Implemented for every `validator::Validate` type. Types that validate some
/// other way implement it by hand.
pub trait StructValidator {
    fn validate_struct(&self) -> Result<(), StructError>;
}

impl<T: validator::Validate> StructValidator for T {
    fn validate_struct(&self) -> Result<(), StructError> {
        self.validate()
            .map_err(|errors| StructError::Aggregate(entries_from(&errors, "")))
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert validator errors into entries. Fields are visited in name order so
/// the outcome is deterministic.
///
/// Each nested struct or list element becomes one aggregate holding only
/// leaves. Structs nested further down are folded into that aggregate with
/// their full path, e.g. `address.geo` or `items[2].geo`.
pub fn entries_from(errors: &ValidationErrors, path: &str) -> Vec<ValidatorEntry> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut entries = Vec::new();
    for (field, kind) in fields {
        let field = field.to_string();
        match kind {
            ValidationErrorsKind::Field(errs) => {
                entries.extend(errs.iter().map(|err| {
                    ValidatorEntry::Leaf(FieldError {
                        attribute: field.clone(),
                        message: raw_message(err),
                        path: path.to_string(),
                    })
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                let nested = join_path(path, &field);
                entries.push(ValidatorEntry::Aggregate(leaves_from(inner, &nested)));
            }
            ValidationErrorsKind::List(items) => {
                let base = join_path(path, &field);
                for (index, inner) in items {
                    let nested = format!("{base}[{index}]");
                    entries.push(ValidatorEntry::Aggregate(leaves_from(inner, &nested)));
                }
            }
        }
    }
    entries
}

/// Entries of a nested struct with every aggregate opened up.
///
/// `entries_from` only ever emits aggregates of leaves, so one level of
/// expansion is enough.
fn leaves_from(errors: &ValidationErrors, path: &str) -> Vec<ValidatorEntry> {
    entries_from(errors, path)
        .into_iter()
        .flat_map(|entry| match entry {
            ValidatorEntry::Leaf(_) => vec![entry],
            ValidatorEntry::Aggregate(leaves) => leaves,
        })
        .collect()
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

/// Raw message of a missing or zero value.
const REQUIRED: &str = "non zero value required";

/// Render a validator error in the raw message vocabulary.
///
/// An explicit message on the rule is kept verbatim. A length rule with only
/// one bound gets the open side filled in (`0` or `u64::MAX`), and a length
/// rule demanding at least one character reads as a missing value when the
/// value is empty.
pub fn raw_message(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    if err.code == "required" {
        return REQUIRED.to_string();
    }

    let value = param(err, "value").unwrap_or_default();
    let (min, max) = (param(err, "min"), param(err, "max"));

    let bounds = if err.code == "length" {
        if value.is_empty() && min.as_deref() == Some("1") {
            return REQUIRED.to_string();
        }
        match (min, max) {
            (None, None) => String::new(),
            (min, max) => format!(
                "({}|{})",
                min.unwrap_or_else(|| "0".to_string()),
                max.unwrap_or_else(|| u64::MAX.to_string()),
            ),
        }
    } else {
        match (min, max) {
            (Some(min), Some(max)) => format!("({min}|{max})"),
            _ => String::new(),
        }
    };

    if value.is_empty() {
        format!("does not validate as {}{bounds}", err.code)
    } else {
        format!("{value} does not validate as {}{bounds}", err.code)
    }
}

fn param(err: &ValidationError, name: &str) -> Option<String> {
    let value = err.params.get(name)?;
    Some(match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

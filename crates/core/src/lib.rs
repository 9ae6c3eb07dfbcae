//! Validation failure model and the pure logic behind record validation:
//! identifier formatting, validator outcome flattening and message
//! normalization. No engine or storage dependencies.

pub mod error;
pub mod failure;
pub mod flatten;
pub mod identifier;
pub mod normalize;
pub mod struct_tags;

pub use error::{BoxError, CoreError};
pub use failure::{
    as_failure, find_failures, is_error, ColumnError, Labeled, ResourceRef, ValidationFailed,
    ValidationFailure,
};
pub use identifier::{format_id, Identifiable, RecordId};
pub use struct_tags::{FieldError, StructError, StructValidator, ValidatorEntry};

//! Record validation on create and update.
//!
//! [`register_callbacks`] attaches [`dispatch::validate`] to a handle. On each
//! whole-record write it runs the record's own [`Validatable`] rules, then its
//! struct-tag rules, and records the resulting failures on the write.

pub mod dispatch;
pub mod register;

pub use dispatch::validate;
pub use register::{
    register_callbacks, registered_callbacks, registered_callbacks_or_error, skip_validations,
};

use crate::engine::Errors;

/// Namespace of the settings keys owned by this module.
pub const PREFIX: &str = "validations";

/// Callback name and handle marker key.
pub const VALIDATE_CALLBACK: &str = "validations:validate";

/// Handle-level flag that disables validation when `true`.
pub const SKIP_VALIDATIONS: &str = "validations:skip_validations";

/// Record-level validation a resource can opt into, for rules struct tags
/// cannot express. Failures go straight onto the write's error list.
pub trait Validatable {
    fn validate(&self, errors: &mut Errors);
}

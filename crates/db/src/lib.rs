//! Persistence engine hooks and the validation callbacks attached to them.
//!
//! - [`engine`]: handles, named callback chains, per-write scopes and the
//!   [`Resource`] trait records implement.
//! - [`validations`]: the validation callback and its registration.
//! - [`config`]: environment-driven handle setup.

pub mod config;
pub mod engine;
pub mod validations;

pub use config::EngineConfig;
pub use engine::{Errors, Handle, Operation, Resource, WriteError, WriteOptions};
pub use validations::{
    register_callbacks, registered_callbacks, registered_callbacks_or_error, skip_validations,
    Validatable,
};

//! Attaching the validation callback to a handle.

use validations_core::CoreError;

use super::dispatch::validate;
use super::{SKIP_VALIDATIONS, VALIDATE_CALLBACK};
use crate::engine::callbacks::{BEFORE_CREATE, BEFORE_UPDATE};
use crate::engine::{Handle, Operation};

/// Register the validation callback ahead of the built-in before-create and
/// before-update hooks, and return a handle carrying the registration marker.
///
/// Safe to call repeatedly: the chains are keyed by callback name, so a
/// second registration replaces the first.
pub fn register_callbacks(handle: &Handle) -> Handle {
    {
        let mut callbacks = handle.callbacks_mut();
        for (operation, anchor) in [
            (Operation::Create, BEFORE_CREATE),
            (Operation::Update, BEFORE_UPDATE),
        ] {
            callbacks
                .chain_mut(operation)
                .before(anchor)
                .register(VALIDATE_CALLBACK, validate);
        }
    }
    tracing::info!(callback = VALIDATE_CALLBACK, "Validation callbacks registered");
    handle.set(VALIDATE_CALLBACK, true)
}

/// Whether `handle` carries the registration marker.
pub fn registered_callbacks(handle: &Handle) -> bool {
    handle.get(VALIDATE_CALLBACK).is_some()
}

/// Startup check for code that relies on validation being active.
///
/// The error is a setup defect, not a data error: propagate it and stop.
pub fn registered_callbacks_or_error(handle: &Handle) -> Result<(), CoreError> {
    if registered_callbacks(handle) {
        return Ok(());
    }
    Err(CoreError::Precondition(format!(
        "{VALIDATE_CALLBACK}: callbacks are not registered"
    )))
}

/// Derive a handle whose writes skip validation.
pub fn skip_validations(handle: &Handle) -> Handle {
    handle.set(SKIP_VALIDATIONS, true)
}

/// Boxed error as stored in a write's error accumulator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by this subsystem itself, as opposed to the validation
/// failures it records on a write.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A setup invariant does not hold (e.g. validation callbacks were never
    /// registered on the handle). Callers let this propagate and stop.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

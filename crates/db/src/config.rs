use validations_core::CoreError;

use crate::engine::Handle;
use crate::validations::{register_callbacks, SKIP_VALIDATIONS};

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Set the handle-level skip flag (default: `false`).
    pub skip_validations: bool,
    /// Attach the validation callbacks when opening a handle (default: `true`).
    pub register_validations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skip_validations: false,
            register_validations: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `VALIDATIONS_SKIP`     | `false` |
    /// | `VALIDATIONS_REGISTER` | `true`  |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let defaults = Self::default();
        Ok(Self {
            skip_validations: read_bool(&lookup, "VALIDATIONS_SKIP", defaults.skip_validations)?,
            register_validations: read_bool(
                &lookup,
                "VALIDATIONS_REGISTER",
                defaults.register_validations,
            )?,
        })
    }
}

fn read_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, CoreError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::Config(format!(
            "{key} must be a boolean, got '{raw}'"
        ))),
    }
}

impl Handle {
    /// Open a handle configured by `config`.
    pub fn from_config(config: &EngineConfig) -> Handle {
        let mut handle = Handle::new();
        if config.register_validations {
            handle = register_callbacks(&handle);
        }
        if config.skip_validations {
            handle.instant_set(SKIP_VALIDATIONS, true);
        }
        handle
    }
}

//! Long-lived engine handle: settings store, callback chains and write entry
//! points.
//!
//! Clones of a [`Handle`] share one callback registry and journal. Settings
//! are per handle: [`Handle::set`] derives a new handle carrying a copy of the
//! parent's settings, while [`Handle::instant_set`] writes in place.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validations_core::{find_failures, BoxError, ValidationFailure};

use super::callbacks::{Callbacks, Operation};
use super::resource::Resource;
use super::scope::{Scope, UPDATE_ATTRS, UPDATE_COLUMN};

// ---------------------------------------------------------------------------
// WriteOptions / JournalEntry / WriteError
// ---------------------------------------------------------------------------

/// Options for a single write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Skip both validation passes for this write only.
    pub skip_validation: bool,
}

/// A write that passed its callback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub operation: Operation,
    pub resource: &'static str,
    /// Hex identifier; empty when the record has none.
    pub id: String,
    /// Columns written by a column update. Empty for whole-record writes.
    pub columns: Vec<String>,
}

/// A write was blocked by the errors its callbacks recorded.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("{operation} of {resource} rejected: {}", join_messages(.errors))]
    Rejected {
        operation: Operation,
        resource: &'static str,
        errors: Vec<BoxError>,
    },
}

impl WriteError {
    pub fn errors(&self) -> &[BoxError] {
        match self {
            Self::Rejected { errors, .. } => errors,
        }
    }

    /// The validation failures among the recorded errors.
    pub fn failures(&self) -> Vec<ValidationFailure> {
        find_failures(self.errors())
    }
}

fn join_messages(errors: &[BoxError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

struct Shared {
    callbacks: RwLock<Callbacks>,
    journal: Mutex<Vec<JournalEntry>>,
}

/// Engine handle that callbacks are registered against.
#[derive(Clone)]
pub struct Handle {
    settings: Arc<DashMap<String, Value>>,
    shared: Arc<Shared>,
}

impl Handle {
    pub fn new() -> Self {
        Self {
            settings: Arc::new(DashMap::new()),
            shared: Arc::new(Shared {
                callbacks: RwLock::new(Callbacks::default()),
                journal: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Read a handle-level setting.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings.get(key).map(|v| v.value().clone())
    }

    /// Derive a handle with `key` set. `self` is left unchanged.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Handle {
        let settings = (*self.settings).clone();
        settings.insert(key.into(), value.into());
        Handle {
            settings: Arc::new(settings),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Set `key` on this handle (and every clone sharing its settings).
    pub fn instant_set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn callbacks(&self) -> RwLockReadGuard<'_, Callbacks> {
        self.shared
            .callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn callbacks_mut(&self) -> RwLockWriteGuard<'_, Callbacks> {
        self.shared
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes committed so far, oldest first.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.shared
            .journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn commit(&self, entry: JournalEntry) {
        self.shared
            .journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    // -- writes -------------------------------------------------------------

    pub fn create(&self, record: &dyn Resource) -> Result<(), WriteError> {
        self.create_with(record, &WriteOptions::default())
    }

    pub fn create_with(
        &self,
        record: &dyn Resource,
        options: &WriteOptions,
    ) -> Result<(), WriteError> {
        self.run(Operation::Create, record, options, HashMap::new())
    }

    pub fn update(&self, record: &dyn Resource) -> Result<(), WriteError> {
        self.update_with(record, &WriteOptions::default())
    }

    pub fn update_with(
        &self,
        record: &dyn Resource,
        options: &WriteOptions,
    ) -> Result<(), WriteError> {
        self.run(Operation::Update, record, options, HashMap::new())
    }

    /// Update a single column. Runs the update chain flagged as a column
    /// write, which whole-record callbacks such as validation skip.
    pub fn update_column(
        &self,
        record: &dyn Resource,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<(), WriteError> {
        let mut attrs = serde_json::Map::new();
        attrs.insert(column.to_string(), value.into());

        let mut values = HashMap::new();
        values.insert(UPDATE_COLUMN.to_string(), Value::Bool(true));
        values.insert(UPDATE_ATTRS.to_string(), Value::Object(attrs));
        self.run(Operation::Update, record, &WriteOptions::default(), values)
    }

    fn run(
        &self,
        operation: Operation,
        record: &dyn Resource,
        options: &WriteOptions,
        values: HashMap<String, Value>,
    ) -> Result<(), WriteError> {
        // Copy the chain out so callbacks may touch the registry.
        let funcs = self.callbacks().chain(operation).funcs();

        let mut scope = Scope::new(self, operation, Some(record), options, values);
        for func in funcs {
            func(&mut scope);
        }

        let errors = scope.into_errors();
        if errors.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            %operation,
            resource = record.type_name(),
            errors = errors.len(),
            "Write rejected"
        );
        Err(WriteError::Rejected {
            operation,
            resource: record.type_name(),
            errors: errors.into_vec(),
        })
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("settings", &self.settings)
            .field("callbacks", &*self.callbacks())
            .finish()
    }
}

//! Per-write working context handed to every callback.

use std::collections::HashMap;

use serde_json::Value;
use validations_core::{format_id, BoxError};

use super::callbacks::Operation;
use super::handle::{Handle, JournalEntry, WriteOptions};
use super::resource::Resource;

/// Per-call key marking a write that only touches specific columns.
pub const UPDATE_COLUMN: &str = "orm:update_column";

/// Per-call key carrying the column values of an update-column write.
pub const UPDATE_ATTRS: &str = "orm:update_attrs";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error accumulator of a single write. Any entry rejects the write.
#[derive(Debug, Default)]
pub struct Errors(Vec<BoxError>);

impl Errors {
    pub fn add(&mut self, err: impl Into<BoxError>) {
        self.0.push(err.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<BoxError> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// State of one create or update attempt.
pub struct Scope<'a> {
    handle: &'a Handle,
    operation: Operation,
    record: Option<&'a dyn Resource>,
    options: &'a WriteOptions,
    values: HashMap<String, Value>,
    errors: Errors,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        handle: &'a Handle,
        operation: Operation,
        record: Option<&'a dyn Resource>,
        options: &'a WriteOptions,
        values: HashMap<String, Value>,
    ) -> Self {
        Self {
            handle,
            operation,
            record,
            options,
            values,
            errors: Errors::default(),
        }
    }

    pub fn handle(&self) -> &'a Handle {
        self.handle
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The record being written, if any.
    pub fn record(&self) -> Option<&'a dyn Resource> {
        self.record
    }

    pub fn options(&self) -> &'a WriteOptions {
        self.options
    }

    pub fn type_name(&self) -> &'static str {
        self.record.map_or("<none>", |r| r.type_name())
    }

    /// Per-call value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Whether this write only updates specific columns.
    pub fn is_update_column(&self) -> bool {
        self.values.contains_key(UPDATE_COLUMN)
    }

    pub fn add_error(&mut self, err: impl Into<BoxError>) {
        self.errors.add(err);
    }

    /// Whether an earlier callback already recorded an error.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    pub(crate) fn commit(&self) {
        let id = self
            .record
            .and_then(|r| r.primary_key())
            .map(|id| format_id(Some(&id)))
            .unwrap_or_default();
        let columns = match self.values.get(UPDATE_ATTRS) {
            Some(Value::Object(attrs)) => attrs.keys().cloned().collect(),
            _ => Vec::new(),
        };
        self.handle.commit(JournalEntry {
            operation: self.operation,
            resource: self.type_name(),
            id,
            columns,
        });
    }

    pub(crate) fn into_errors(self) -> Errors {
        self.errors
    }
}

//! Named, ordered callback chains for create and update writes.
//!
//! Each chain is keyed by callback name: registering a name that already
//! exists replaces the old entry instead of adding a second one.

use serde::{Deserialize, Serialize};

use super::scope::Scope;

/// A callback run against the scope of one write.
pub type CallbackFn = fn(&mut Scope<'_>);

pub const BEFORE_CREATE: &str = "orm:before_create";
pub const CREATE: &str = "orm:create";
pub const AFTER_CREATE: &str = "orm:after_create";
pub const BEFORE_UPDATE: &str = "orm:before_update";
pub const UPDATE: &str = "orm:update";
pub const AFTER_UPDATE: &str = "orm:after_update";

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The kind of write a chain handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Entry {
    name: String,
    func: CallbackFn,
}

/// An ordered list of named callbacks.
#[derive(Clone, Default)]
pub struct Chain {
    entries: Vec<Entry>,
}

impl Chain {
    /// Append `name`, replacing any existing entry of that name.
    pub fn register(&mut self, name: impl Into<String>, func: CallbackFn) {
        self.insert(name.into(), func, None);
    }

    /// Position the next registration immediately before `anchor`.
    pub fn before(&mut self, anchor: impl Into<String>) -> Registration<'_> {
        Registration {
            chain: self,
            anchor: anchor.into(),
        }
    }

    /// Callback names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub(crate) fn funcs(&self) -> Vec<CallbackFn> {
        self.entries.iter().map(|e| e.func).collect()
    }

    fn insert(&mut self, name: String, func: CallbackFn, anchor: Option<&str>) {
        self.entries.retain(|e| e.name != name);
        // A missing anchor appends.
        let at = anchor
            .and_then(|a| self.entries.iter().position(|e| e.name == a))
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Entry { name, func });
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Pending registration relative to an anchor callback.
pub struct Registration<'a> {
    chain: &'a mut Chain,
    anchor: String,
}

impl Registration<'_> {
    pub fn register(self, name: impl Into<String>, func: CallbackFn) {
        self.chain.insert(name.into(), func, Some(self.anchor.as_str()));
    }
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// The create and update chains of a handle.
#[derive(Debug, Clone)]
pub struct Callbacks {
    create: Chain,
    update: Chain,
}

impl Callbacks {
    pub fn chain(&self, operation: Operation) -> &Chain {
        match operation {
            Operation::Create => &self.create,
            Operation::Update => &self.update,
        }
    }

    pub fn chain_mut(&mut self, operation: Operation) -> &mut Chain {
        match operation {
            Operation::Create => &mut self.create,
            Operation::Update => &mut self.update,
        }
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        let mut create = Chain::default();
        create.register(BEFORE_CREATE, before_write);
        create.register(CREATE, commit_write);
        create.register(AFTER_CREATE, after_write);

        let mut update = Chain::default();
        update.register(BEFORE_UPDATE, before_write);
        update.register(UPDATE, commit_write);
        update.register(AFTER_UPDATE, after_write);

        Self { create, update }
    }
}

// ---------------------------------------------------------------------------
// Built-in hooks
// ---------------------------------------------------------------------------

fn before_write(scope: &mut Scope<'_>) {
    tracing::trace!(
        operation = %scope.operation(),
        resource = scope.type_name(),
        "Before write"
    );
}

/// Commits the write to the handle journal unless an error was recorded.
fn commit_write(scope: &mut Scope<'_>) {
    if scope.has_error() {
        return;
    }
    scope.commit();
}

fn after_write(scope: &mut Scope<'_>) {
    if scope.has_error() {
        return;
    }
    tracing::trace!(
        operation = %scope.operation(),
        resource = scope.type_name(),
        "After write"
    );
}

//! Validation failure types recorded against a write.
//!
//! Two shapes exist: [`ValidationFailed`] addresses a field (optionally under
//! a sub-path of an embedded structure) and [`ColumnError`] addresses a column
//! only. [`ValidationFailure`] is the enum over both and is what the
//! validation callback records on the write.
//!
//! Both expose a [`Labeled::label`] correlation key and display their message
//! verbatim through `Display`.

use crate::error::BoxError;
use crate::identifier::{format_id, Identifiable, RecordId};

// ---------------------------------------------------------------------------
// ResourceRef
// ---------------------------------------------------------------------------

/// Snapshot of the resource a failure refers to, taken at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    type_name: &'static str,
    id: Option<RecordId>,
}

impl ResourceRef {
    pub fn of<R: Identifiable + ?Sized>(resource: &R) -> Self {
        Self {
            type_name: resource.type_name(),
            id: resource.primary_key(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

fn label_for(resource: &ResourceRef, column: &str) -> String {
    format!(
        "{}_{}_{}",
        resource.type_name,
        format_id(resource.id()),
        column
    )
}

/// A correlation key for grouping displayed failures by resource and column.
pub trait Labeled {
    /// `<TypeName>_<hex id>_<column>`. Not an equality key.
    fn label(&self) -> String;
}

// ---------------------------------------------------------------------------
// ValidationFailed
// ---------------------------------------------------------------------------

/// A failed check against one field of a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailed {
    resource: ResourceRef,
    column: String,
    field_name: String,
    message: String,
    path: String,
}

impl ValidationFailed {
    /// Failure addressed by column name.
    pub fn failed<R: Identifiable + ?Sized>(
        resource: &R,
        column: impl Into<String>,
        message: impl Into<String>,
        path: Option<&str>,
    ) -> Self {
        Self::build(resource, column.into(), String::new(), message.into(), path)
    }

    /// Failure addressed by struct field name.
    pub fn field_failed<R: Identifiable + ?Sized>(
        resource: &R,
        field_name: impl Into<String>,
        message: impl Into<String>,
        path: Option<&str>,
    ) -> Self {
        Self::build(resource, String::new(), field_name.into(), message.into(), path)
    }

    fn build<R: Identifiable + ?Sized>(
        resource: &R,
        column: String,
        field_name: String,
        message: String,
        path: Option<&str>,
    ) -> Self {
        debug_assert!(!message.is_empty(), "validation failure without a message");
        Self {
            resource: ResourceRef::of(resource),
            column,
            field_name,
            message,
            path: path.unwrap_or_default().to_string(),
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sub-path inside an embedded structure; empty for top-level fields.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Labeled for ValidationFailed {
    fn label(&self) -> String {
        let column = if self.column.is_empty() {
            &self.field_name
        } else {
            &self.column
        };
        label_for(&self.resource, column)
    }
}

// ---------------------------------------------------------------------------
// ColumnError
// ---------------------------------------------------------------------------

/// Column-addressed failure, for call sites without a field/path distinction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ColumnError {
    resource: ResourceRef,
    column: String,
    message: String,
}

impl ColumnError {
    pub fn new<R: Identifiable + ?Sized>(
        resource: &R,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "validation failure without a message");
        Self {
            resource: ResourceRef::of(resource),
            column: column.into(),
            message,
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Labeled for ColumnError {
    fn label(&self) -> String {
        label_for(&self.resource, &self.column)
    }
}

// ---------------------------------------------------------------------------
// ValidationFailure
// ---------------------------------------------------------------------------

/// Either failure shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error(transparent)]
    Failed(#[from] ValidationFailed),

    #[error(transparent)]
    Column(#[from] ColumnError),
}

impl ValidationFailure {
    pub fn message(&self) -> &str {
        match self {
            Self::Failed(f) => f.message(),
            Self::Column(c) => c.message(),
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        match self {
            Self::Failed(f) => f.resource(),
            Self::Column(c) => c.resource(),
        }
    }

    /// Sub-path for field failures; always empty for column failures.
    pub fn path(&self) -> &str {
        match self {
            Self::Failed(f) => f.path(),
            Self::Column(_) => "",
        }
    }
}

impl Labeled for ValidationFailure {
    fn label(&self) -> String {
        match self {
            Self::Failed(f) => f.label(),
            Self::Column(c) => c.label(),
        }
    }
}

// ---------------------------------------------------------------------------
// Type tests
// ---------------------------------------------------------------------------

/// Recover a failure from an accumulated error, whichever shape it was
/// recorded as.
pub fn as_failure(err: &(dyn std::error::Error + 'static)) -> Option<ValidationFailure> {
    if let Some(failure) = err.downcast_ref::<ValidationFailure>() {
        return Some(failure.clone());
    }
    if let Some(failed) = err.downcast_ref::<ValidationFailed>() {
        return Some(failed.clone().into());
    }
    err.downcast_ref::<ColumnError>()
        .map(|column| column.clone().into())
}

/// Whether `err` is one of this subsystem's validation failures.
pub fn is_error(err: &(dyn std::error::Error + 'static)) -> bool {
    err.is::<ValidationFailure>() || err.is::<ValidationFailed>() || err.is::<ColumnError>()
}

/// Every validation failure among `errors`, in order. Other errors are skipped.
pub fn find_failures<'a, I>(errors: I) -> Vec<ValidationFailure>
where
    I: IntoIterator<Item = &'a BoxError>,
{
    errors
        .into_iter()
        .filter_map(|err| as_failure(&**err))
        .collect()
}

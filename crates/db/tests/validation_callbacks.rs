//! End-to-end tests for the validation callbacks.
//!
//! Exercises the full create/update chains of a handle:
//! - Struct-tag failures are normalized and labelled
//! - Skip flag (handle-level and per-write) and column updates bypass validation
//! - Earlier failures stop validation, record-level rules run alongside tags
//! - Registration is idempotent

use assert_matches::assert_matches;
use uuid::Uuid;
use validator::Validate;
use validations_core::{
    is_error, ColumnError, Identifiable, Labeled, RecordId, StructError, StructValidator,
};
use validations_db::engine::callbacks::BEFORE_CREATE;
use validations_db::engine::{Errors, Scope};
use validations_db::validations::VALIDATE_CALLBACK;
use validations_db::{
    register_callbacks, registered_callbacks, skip_validations, Handle, Operation, Resource,
    Validatable, WriteError, WriteOptions,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Validate)]
struct User {
    id: Option<Uuid>,
    #[validate(required, length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 3, max = 20))]
    login: String,
    #[validate(email)]
    email: String,
}

impl Identifiable for User {
    fn primary_key(&self) -> Option<RecordId> {
        self.id.map(RecordId::from)
    }
}

impl Resource for User {}

fn valid_user() -> User {
    User {
        id: None,
        name: Some("Alice".to_string()),
        login: "alice".to_string(),
        email: "alice@example.com".to_string(),
    }
}

#[derive(Debug, Validate)]
struct Address {
    #[validate(length(min = 2, max = 40))]
    city: String,
}

#[derive(Debug, Validate)]
struct Account {
    #[validate(length(min = 1, max = 64))]
    title: String,
    #[validate(nested)]
    address: Address,
}

impl Identifiable for Account {
    fn primary_key(&self) -> Option<RecordId> {
        Some(RecordId::from(vec![0xab, 0xcd]))
    }
}

/// Reserves the title "admin" on top of its struct tags.
impl Validatable for Account {
    fn validate(&self, errors: &mut Errors) {
        if self.title == "admin" {
            errors.add(ColumnError::new(self, "title", "title is reserved"));
        }
    }
}

impl Resource for Account {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}

#[derive(Debug, Validate)]
struct Geo {
    #[validate(length(min = 2, max = 10))]
    code: String,
}

#[derive(Debug, Validate)]
struct Destination {
    #[validate(length(min = 2, max = 40))]
    city: String,
    #[validate(nested)]
    geo: Geo,
}

#[derive(Debug, Validate)]
struct Parcel {
    #[validate(nested)]
    destination: Destination,
}

impl Identifiable for Parcel {}

impl Resource for Parcel {}

/// Validates without struct tags and fails with a non-field error.
struct Blob;

impl Identifiable for Blob {}

impl StructValidator for Blob {
    fn validate_struct(&self) -> Result<(), StructError> {
        Err(StructError::Opaque("blob payload is not a struct".into()))
    }
}

impl Resource for Blob {}

fn registered() -> Handle {
    register_callbacks(&Handle::new())
}

fn failure_messages(err: &WriteError) -> Vec<String> {
    err.failures().iter().map(|f| f.message().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Struct-tag failures
// ---------------------------------------------------------------------------

#[test]
fn blank_required_field_is_reported_once() {
    let handle = registered();
    let user = User {
        name: None,
        ..valid_user()
    };

    let err = handle.create(&user).unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message().ends_with("can't be blank"));
    assert_eq!(failures[0].label(), "User__name");
    assert!(handle.journal().is_empty());
}

#[test]
fn every_failure_is_recorded_in_field_order() {
    let handle = registered();
    let user = User {
        id: None,
        name: None,
        login: "al".to_string(),
        email: "not-an-email".to_string(),
    };

    let err = handle.create(&user).unwrap_err();
    assert_eq!(
        failure_messages(&err),
        [
            "email is not a valid email address",
            "login is the wrong length (should be 3~20 characters)",
            "name can't be blank",
        ]
    );
    assert_matches!(&err, WriteError::Rejected { operation: Operation::Create, resource: "User", .. });
    assert!(err.errors().iter().all(|e| is_error(&**e)));
}

#[test]
fn label_uses_hex_identifier() {
    let handle = registered();
    let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let user = User {
        id: Some(id),
        name: None,
        ..valid_user()
    };

    let err = handle.update(&user).unwrap_err();
    assert_eq!(
        err.failures()[0].label(),
        "User_67e5504410b1426f9247bb680e5fe0c8_name"
    );
}

#[test]
fn nested_failures_carry_their_path() {
    let handle = registered();
    let account = Account {
        title: "Savings".to_string(),
        address: Address {
            city: "x".to_string(),
        },
    };

    let err = handle.create(&account).unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].message(),
        "city is the wrong length (should be 2~40 characters)"
    );
    assert_eq!(failures[0].path(), "address");
    assert_eq!(failures[0].label(), "Account_abcd_city");
}

#[test]
fn empty_required_value_is_blank() {
    let handle = registered();
    let user = User {
        name: Some(String::new()),
        ..valid_user()
    };

    let err = handle.create(&user).unwrap_err();
    assert_eq!(failure_messages(&err), ["name can't be blank"]);
    assert!(handle.journal().is_empty());
}

#[test]
fn doubly_nested_failure_rejects_the_write() {
    let handle = registered();
    let parcel = Parcel {
        destination: Destination {
            city: "Oslo".to_string(),
            geo: Geo {
                code: "x".to_string(),
            },
        },
    };
    assert!(parcel.validate().is_err());

    let err = handle.create(&parcel).unwrap_err();
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures[0].message(),
        "code is the wrong length (should be 2~10 characters)"
    );
    assert_eq!(failures[0].path(), "destination.geo");
    assert!(handle.journal().is_empty());
}

#[test]
fn opaque_validator_error_passes_through() {
    let handle = registered();
    let err = handle.create(&Blob).unwrap_err();

    assert!(err.failures().is_empty());
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].to_string(), "blob payload is not a struct");
}

#[test]
fn valid_record_is_committed() {
    let handle = registered();
    handle.create(&valid_user()).unwrap();

    let journal = handle.journal();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].operation, Operation::Create);
    assert_eq!(journal[0].resource, "User");
    assert_eq!(journal[0].id, "");
}

// ---------------------------------------------------------------------------
// Skipping
// ---------------------------------------------------------------------------

#[test]
fn handle_skip_flag_disables_validation() {
    let handle = skip_validations(&registered());
    let user = User {
        name: None,
        login: String::new(),
        ..valid_user()
    };

    handle.create(&user).unwrap();
    handle.update(&user).unwrap();
    assert_eq!(handle.journal().len(), 2);
}

#[test]
fn skip_flag_does_not_leak_to_parent_handle() {
    let handle = registered();
    let skipping = skip_validations(&handle);
    let user = User {
        name: None,
        ..valid_user()
    };

    assert!(skipping.create(&user).is_ok());
    assert!(handle.create(&user).is_err());
}

#[test]
fn per_write_option_disables_validation() {
    let handle = registered();
    let user = User {
        name: None,
        ..valid_user()
    };
    let options = WriteOptions {
        skip_validation: true,
    };

    handle.create_with(&user, &options).unwrap();
    assert!(handle.update_with(&user, &WriteOptions::default()).is_err());
}

#[test]
fn column_update_is_not_validated() {
    let handle = registered();
    let user = User {
        name: None,
        ..valid_user()
    };

    handle.update_column(&user, "login", "bob").unwrap();
    let journal = handle.journal();
    assert_eq!(journal[0].operation, Operation::Update);
    assert_eq!(journal[0].columns, ["login"]);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

fn fail_early(scope: &mut Scope<'_>) {
    scope.add_error("quota exceeded");
}

#[test]
fn earlier_failure_stops_validation() {
    let handle = registered();
    handle
        .callbacks_mut()
        .chain_mut(Operation::Create)
        .before(VALIDATE_CALLBACK)
        .register("test:fail_early", fail_early);

    let user = User {
        name: None,
        ..valid_user()
    };
    let err = handle.create(&user).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].to_string(), "quota exceeded");
    assert!(err.failures().is_empty());
}

#[test]
fn record_rules_do_not_suppress_struct_tags() {
    let handle = registered();
    let account = Account {
        title: "admin".to_string(),
        address: Address {
            city: "x".to_string(),
        },
    };

    let err = handle.create(&account).unwrap_err();
    assert_eq!(
        failure_messages(&err),
        [
            "title is reserved",
            "city is the wrong length (should be 2~40 characters)",
        ]
    );
    assert_eq!(err.failures()[0].label(), "Account_abcd_title");
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn unregistered_handle_does_not_validate() {
    let handle = Handle::new();
    let user = User {
        name: None,
        ..valid_user()
    };

    assert!(!registered_callbacks(&handle));
    handle.create(&user).unwrap();
}

#[test]
fn registering_twice_does_not_duplicate_failures() {
    let handle = register_callbacks(&registered());
    let user = User {
        name: None,
        ..valid_user()
    };

    let err = handle.create(&user).unwrap_err();
    assert_eq!(err.failures().len(), 1);

    let callbacks = handle.callbacks();
    let names = callbacks.chain(Operation::Create).names();
    assert_eq!(names[..2], [VALIDATE_CALLBACK, BEFORE_CREATE]);
}

#[test]
fn registration_is_visible_to_every_clone() {
    let base = Handle::new();
    let clone = base.clone();
    let handle = register_callbacks(&base);
    let user = User {
        name: None,
        ..valid_user()
    };

    // Chains are shared; only the marker lives on the returned handle.
    assert!(clone.create(&user).is_err());
    assert!(!registered_callbacks(&clone));
    assert!(registered_callbacks(&handle));
}

#[test]
fn concurrent_writes_are_independent() {
    let handle = registered();

    std::thread::scope(|s| {
        for i in 0..8 {
            let handle = handle.clone();
            s.spawn(move || {
                let user = User {
                    name: (i % 2 == 0).then(|| format!("user-{i}")),
                    ..valid_user()
                };
                let result = handle.create(&user);
                if i % 2 == 0 {
                    assert!(result.is_ok());
                } else {
                    assert_eq!(result.unwrap_err().failures().len(), 1);
                }
            });
        }
    });

    assert_eq!(handle.journal().len(), 4);
}

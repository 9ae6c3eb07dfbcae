//! Record types accepted by `validations-check`.

use serde::Deserialize;
use validations_core::{Identifiable, RecordId};
use validations_db::{Errors, Resource, Validatable};
use validator::Validate;

/// Logins nobody may claim.
const RESERVED_LOGINS: &[&str] = &["admin", "root", "system"];

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 2, max = 80))]
    pub city: String,
}

/// A customer record as found in the input file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 20))]
    pub login: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(nested)]
    pub address: Option<Address>,
}

impl Identifiable for Customer {
    fn primary_key(&self) -> Option<RecordId> {
        self.id.map(RecordId::from)
    }
}

impl Validatable for Customer {
    fn validate(&self, errors: &mut Errors) {
        if RESERVED_LOGINS.contains(&self.login.as_str()) {
            errors.add(validations_core::ColumnError::new(
                self,
                "login",
                format!("login {} is reserved", self.login),
            ));
        }
    }
}

impl Resource for Customer {
    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::models::{
    credential::HashedPassword, credit_card::CreditCard, photo::PhotoReference,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i32);
impl UserId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user row about to be inserted. Every field is present.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub address: String,
    pub email: String,
    pub password: HashedPassword,
}

/// Fields to change on an existing user. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password: Option<HashedPassword>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

/// A stored user together with its credit card and photos, as read back from the store.
///
/// Columns are nullable at the storage layer, hence the `Option`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub credit_card: Option<CreditCard>,
    pub photos: Vec<PhotoReference>,
}

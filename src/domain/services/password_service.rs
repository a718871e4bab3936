use crate::domain::{error::DomainError, models::credential::HashedPassword};

/// One-way, salted password hashing
pub trait PasswordHasher: Clone {
    /// Hash a plain text password
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError>;
}

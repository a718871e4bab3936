//! Field rules shared by registration and update.

use chrono::{DateTime, Utc};
use validator::{ValidateCreditCard, ValidateEmail};

use crate::domain::{error::ValidationError, models::credit_card::CardExpiry};

pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value)
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Drop the space and dash separators people type between digit groups.
pub fn normalize_card_number(number: &str) -> String {
    number.chars().filter(|c| !matches!(c, ' ' | '-')).collect()
}

/// Digits only once separators are dropped, Luhn checksum must hold.
pub fn validate_card_number(number: &str) -> Result<(), ValidationError> {
    let digits = normalize_card_number(number);
    if !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && digits.validate_credit_card()
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidCardNumber)
    }
}

pub fn validate_expiry(expiry: &str, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if CardExpiry::parse(expiry)?.is_valid_at(now) {
        Ok(())
    } else {
        Err(ValidationError::InvalidExpiry)
    }
}

pub fn validate_cvv(cvv: &str) -> Result<(), ValidationError> {
    if (3..=4).contains(&cvv.len()) && cvv.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCvv)
    }
}

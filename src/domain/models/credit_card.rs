use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{error::ValidationError, models::user::UserId};

/// Card expiry in `MM/YY` form.
///
/// A card lapses once its expiry month begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    month: u32,
    year: i32,
}

impl CardExpiry {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let (month, year) = value
            .split_once('/')
            .filter(|(m, y)| m.len() == 2 && y.len() == 2)
            .ok_or(ValidationError::InvalidExpiry)?;

        if !month.chars().chain(year.chars()).all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidExpiry);
        }

        let month: u32 = month.parse().map_err(|_| ValidationError::InvalidExpiry)?;
        let year: i32 = year.parse().map_err(|_| ValidationError::InvalidExpiry)?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidExpiry);
        }

        Ok(Self {
            month,
            year: 2000 + year,
        })
    }

    /// Start of the expiry month; the card is usable up to and including this instant.
    pub fn lapses_at(&self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.lapses_at().is_some_and(|lapse| now <= lapse)
    }
}

#[derive(Debug, Clone)]
pub struct NewCreditCard {
    pub user_id: UserId,
    pub card_type: String,
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditCardPatch {
    pub card_type: Option<String>,
    pub number: Option<String>,
    pub holder_name: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
}

impl CreditCardPatch {
    pub fn is_empty(&self) -> bool {
        self.card_type.is_none()
            && self.number.is_none()
            && self.holder_name.is_none()
            && self.expiry.is_none()
            && self.cvv.is_none()
    }
}

/// Stored card as returned by reads. The CVV is never read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditCard {
    pub card_type: Option<String>,
    pub number: Option<String>,
    pub holder_name: Option<String>,
    pub expiry: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1/30")]
    #[case("01-30")]
    #[case("13/30")]
    #[case("00/30")]
    #[case("ab/cd")]
    #[case("01/2030")]
    #[case("")]
    fn test_parse_rejects_malformed(#[case] value: &str) {
        assert_eq!(CardExpiry::parse(value), Err(ValidationError::InvalidExpiry));
    }

    #[test]
    fn test_card_lapses_when_expiry_month_begins() {
        let expiry = CardExpiry::parse("10/26").unwrap();

        let month_before = Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap();
        let first_instant = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let within_month = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();

        assert!(expiry.is_valid_at(month_before));
        assert!(expiry.is_valid_at(first_instant));
        assert!(!expiry.is_valid_at(within_month));
    }

    #[test]
    fn test_lapse_is_first_day_of_month() {
        let expiry = CardExpiry::parse("12/29").unwrap();
        assert_eq!(
            expiry.lapses_at(),
            Some(Utc.with_ymd_and_hms(2029, 12, 1, 0, 0, 0).unwrap())
        );
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::models::{
    credit_card::CreditCard,
    photo::PhotoReference,
    user::{UserId, UserRecord},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardView {
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub number: Option<String>,
    pub name: Option<String>,
    pub expired: Option<String>,
}

/// Outward shape of a user. Card numbers are cut to their last four characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub photos: Vec<String>,
    pub creditcard: Option<CreditCardView>,
}

impl UserView {
    pub fn project(record: UserRecord, photo_url_prefix: &str) -> Self {
        Self {
            user_id: record.id,
            name: record.name,
            email: record.email,
            address: record.address,
            photos: record
                .photos
                .iter()
                .map(|reference| public_path(photo_url_prefix, reference))
                .collect(),
            creditcard: record.credit_card.map(CreditCardView::from),
        }
    }
}

impl From<CreditCard> for CreditCardView {
    fn from(card: CreditCard) -> Self {
        Self {
            card_type: card.card_type,
            number: card.number.as_deref().map(last_four),
            name: card.holder_name,
            expired: card.expiry,
        }
    }
}

pub fn last_four(number: &str) -> String {
    match number.char_indices().rev().nth(3) {
        Some((start, _)) => number[start..].to_string(),
        None => number.to_string(),
    }
}

pub fn public_path(prefix: &str, reference: &PhotoReference) -> String {
    let prefix = prefix.replace('\\', "/");
    let reference = reference.as_str().replace('\\', "/");
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

pub mod credit_cards;
pub mod photos;
pub mod users;

pub mod credential;
pub mod credit_card;
pub mod photo;
pub mod query;
pub mod user;

pub mod credit_card_repository;
pub mod photo_repository;
pub mod user_repository;

pub mod argon2_password_hasher;
pub mod credit_card_repository;
pub mod db_error;
pub mod entity;
pub mod local_photo_storage;
pub mod logging;
pub mod photo_repository;
pub mod schema;
pub mod user_repository;

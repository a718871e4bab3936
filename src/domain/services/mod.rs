pub mod password_service;
pub mod photo_storage;

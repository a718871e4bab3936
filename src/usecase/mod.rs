pub mod query_user_usecase;
pub mod register_user_usecase;
pub mod update_user_usecase;
pub mod user_projection;
mod write_support;

//! Fixtures shared by the test modules.

use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::{
    domain::models::photo::Upload,
    infrastructure::schema::create_schema,
    usecase::register_user_usecase::{CreditCardInput, RegisterUserCommand},
};

pub const VALID_CARD: &str = "4111111111111111";

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    create_schema(&db).await.unwrap();
    db
}

pub async fn count_rows<E>(db: &DatabaseConnection) -> u64
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    E::find().count(db).await.unwrap()
}

pub fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .map(|path| if path.is_dir() { count_files(&path) } else { 1 })
        .sum()
}

pub fn image(file_name: &str) -> Upload {
    Upload {
        content_type: "image/png".to_string(),
        file_name: file_name.to_string(),
        content: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

pub fn text_file(file_name: &str) -> Upload {
    Upload {
        content_type: "text/plain".to_string(),
        file_name: file_name.to_string(),
        content: b"hello".to_vec(),
    }
}

pub fn register_command(name: &str, email: &str) -> RegisterUserCommand {
    RegisterUserCommand {
        name: name.to_string(),
        address: "12 Market Street".to_string(),
        email: email.to_string(),
        password: "s3cret-pass".to_string(),
        credit_card: CreditCardInput {
            card_type: "visa".to_string(),
            number: VALID_CARD.to_string(),
            holder_name: name.to_string(),
            expiry: "12/99".to_string(),
            cvv: "123".to_string(),
        },
        uploads: vec![image("face.png")],
    }
}

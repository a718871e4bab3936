use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::infrastructure::entity::{credit_cards, photos, users};

/// Creates the `users`, `credit_cards` and `photos` tables when they are missing.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(credit_cards::Entity),
        schema.create_table_from_entity(photos::Entity),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(backend.build(&table)).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}

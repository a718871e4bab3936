use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::domain::{error::RepositoryError, models::photo::NewPhoto};

#[async_trait]
pub trait PhotoRepository {
    /// Inserts every photo in one statement, or none of them.
    async fn insert_batch(
        &self,
        txn: &DatabaseTransaction,
        photos: Vec<NewPhoto>,
    ) -> Result<(), RepositoryError>;
}

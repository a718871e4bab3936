use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, DatabaseTransaction, EntityTrait};

use crate::{
    domain::{
        error::RepositoryError, models::photo::NewPhoto,
        repositories::photo_repository::PhotoRepository,
    },
    infrastructure::{db_error::map_db_err, entity::photos},
};

#[derive(Clone, Default)]
pub struct SeaOrmPhotoRepository;

impl SeaOrmPhotoRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhotoRepository for SeaOrmPhotoRepository {
    async fn insert_batch(
        &self,
        txn: &DatabaseTransaction,
        batch: Vec<NewPhoto>,
    ) -> Result<(), RepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }

        let models = batch.into_iter().map(|photo| photos::ActiveModel {
            user_id: Set(photo.user_id.value()),
            filename: Set(photo.reference.as_str().to_string()),
            ..Default::default()
        });

        photos::Entity::insert_many(models)
            .exec_without_returning(txn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

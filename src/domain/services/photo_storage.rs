use async_trait::async_trait;

use crate::domain::{
    error::StorageError,
    models::{photo::PhotoReference, user::UserId},
};

/// Durable storage for uploaded photo content, outside the database.
#[async_trait]
pub trait PhotoStorage {
    /// Writes `content` under the owner's directory and returns its relative reference.
    async fn write(
        &self,
        owner: UserId,
        content: &[u8],
        original_name: &str,
    ) -> Result<PhotoReference, StorageError>;

    /// Deletes a previously written photo. Removing a missing file succeeds.
    async fn remove(&self, reference: &PhotoReference) -> Result<(), StorageError>;
}

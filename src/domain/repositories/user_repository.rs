use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::domain::{
    error::RepositoryError,
    models::{
        query::UserQuery,
        user::{NewUser, UserId, UserPatch, UserRecord},
    },
};

/// Write operations run inside the caller's transaction; reads use the pool directly.
#[async_trait]
pub trait UserRepository {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        user: NewUser,
    ) -> Result<UserId, RepositoryError>;

    /// Fails with `NotFound` when no user has this id.
    async fn update(
        &self,
        txn: &DatabaseTransaction,
        id: UserId,
        patch: UserPatch,
    ) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_all(&self, query: &UserQuery) -> Result<Vec<UserRecord>, RepositoryError>;
}

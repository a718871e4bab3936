use crate::{
    domain::{
        error::DomainError,
        models::{
            query::{UserQuery, UserQueryInput},
            user::UserId,
        },
        repositories::user_repository::UserRepository,
    },
    usecase::{user_projection::UserView, write_support::internal},
};

pub struct QueryUserUsecase<U>
where
    U: UserRepository,
{
    user_repository: U,
    photo_url_prefix: String,
}

impl<U> QueryUserUsecase<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: U, photo_url_prefix: impl Into<String>) -> Self {
        Self {
            user_repository,
            photo_url_prefix: photo_url_prefix.into(),
        }
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserView, DomainError>
    where
        U: Send + Sync,
    {
        let record = self
            .user_repository
            .find_by_id(id)
            .await
            .map_err(|e| internal("Failed to load user", e))?
            .ok_or(DomainError::UserNotFound)?;

        Ok(UserView::project(record, &self.photo_url_prefix))
    }

    pub async fn list_users(&self, input: UserQueryInput) -> Result<Vec<UserView>, DomainError>
    where
        U: Send + Sync,
    {
        let query = UserQuery::try_from(input)?;
        tracing::debug!(?query, "Listing users");

        let records = self
            .user_repository
            .find_all(&query)
            .await
            .map_err(|e| internal("Failed to list users", e))?;

        Ok(records
            .into_iter()
            .map(|record| UserView::project(record, &self.photo_url_prefix))
            .collect())
    }
}

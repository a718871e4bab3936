use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::domain::{
    error::RepositoryError,
    models::{
        credit_card::{CreditCardPatch, NewCreditCard},
        user::UserId,
    },
};

#[async_trait]
pub trait CreditCardRepository {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        card: NewCreditCard,
    ) -> Result<(), RepositoryError>;

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        user_id: UserId,
        patch: CreditCardPatch,
    ) -> Result<(), RepositoryError>;
}

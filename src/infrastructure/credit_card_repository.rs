use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            credit_card::{CreditCardPatch, NewCreditCard},
            user::UserId,
        },
        repositories::credit_card_repository::CreditCardRepository,
    },
    infrastructure::{db_error::map_db_err, entity::credit_cards},
};

#[derive(Clone, Default)]
pub struct SeaOrmCreditCardRepository;

impl SeaOrmCreditCardRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CreditCardRepository for SeaOrmCreditCardRepository {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        card: NewCreditCard,
    ) -> Result<(), RepositoryError> {
        let card_model = credit_cards::ActiveModel {
            user_id: Set(card.user_id.value()),
            card_type: Set(Some(card.card_type)),
            number: Set(Some(card.number)),
            name: Set(Some(card.holder_name)),
            expired: Set(Some(card.expiry)),
            cvv: Set(Some(card.cvv)),
        };

        credit_cards::Entity::insert(card_model)
            .exec_without_returning(txn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        user_id: UserId,
        patch: CreditCardPatch,
    ) -> Result<(), RepositoryError> {
        if patch.is_empty() {
            return credit_cards::Entity::find_by_id(user_id.value())
                .one(txn)
                .await
                .map_err(map_db_err)?
                .map(|_| ())
                .ok_or(RepositoryError::NotFound);
        }

        let mut changes = credit_cards::ActiveModel::default();
        if let Some(card_type) = patch.card_type {
            changes.card_type = Set(Some(card_type));
        }
        if let Some(number) = patch.number {
            changes.number = Set(Some(number));
        }
        if let Some(holder_name) = patch.holder_name {
            changes.name = Set(Some(holder_name));
        }
        if let Some(expiry) = patch.expiry {
            changes.expired = Set(Some(expiry));
        }
        if let Some(cvv) = patch.cvv {
            changes.cvv = Set(Some(cvv));
        }

        let result = credit_cards::Entity::update_many()
            .set(changes)
            .filter(credit_cards::Column::UserId.eq(user_id.value()))
            .exec(txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set,
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, Order,
    QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            credit_card::CreditCard,
            photo::PhotoReference,
            query::{OrderBy, SortDirection, UserQuery},
            user::{NewUser, UserId, UserPatch, UserRecord},
        },
        repositories::user_repository::UserRepository,
    },
    infrastructure::{
        db_error::map_db_err,
        entity::{credit_cards, photos, users},
    },
};

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn photos_by_user(
        &self,
        user_ids: Vec<i32>,
    ) -> Result<HashMap<i32, Vec<PhotoReference>>, RepositoryError> {
        let mut grouped: HashMap<i32, Vec<PhotoReference>> = HashMap::new();
        if user_ids.is_empty() {
            return Ok(grouped);
        }

        let rows = photos::Entity::find()
            .filter(photos::Column::UserId.is_in(user_ids))
            .order_by_asc(photos::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        for row in rows {
            grouped
                .entry(row.user_id)
                .or_default()
                .push(PhotoReference::new(row.filename));
        }
        Ok(grouped)
    }
}

fn to_record(
    user: users::Model,
    card: Option<credit_cards::Model>,
    photos: Vec<PhotoReference>,
) -> UserRecord {
    UserRecord {
        id: UserId::new(user.id),
        name: user.name,
        email: user.email,
        address: user.address,
        credit_card: card.map(|card| CreditCard {
            card_type: card.card_type,
            number: card.number,
            holder_name: card.name,
            expiry: card.expired,
        }),
        photos,
    }
}

const LIKE_ESCAPE: char = '\\';

/// Make `%`, `_` and the escape character match themselves inside a LIKE pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn contains_ignore_case(column: users::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((users::Entity, column))))
        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        user: NewUser,
    ) -> Result<UserId, RepositoryError> {
        let user_model = users::ActiveModel {
            name: Set(Some(user.name)),
            address: Set(Some(user.address)),
            email: Set(Some(user.email)),
            password: Set(Some(user.password.into_inner())),
            ..Default::default()
        };

        let insert_result = users::Entity::insert(user_model)
            .exec(txn)
            .await
            .map_err(map_db_err)?;
        Ok(UserId::new(insert_result.last_insert_id))
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        id: UserId,
        patch: UserPatch,
    ) -> Result<(), RepositoryError> {
        // Nothing to write, but the caller still needs to know the user exists.
        if patch.is_empty() {
            return users::Entity::find_by_id(id.value())
                .one(txn)
                .await
                .map_err(map_db_err)?
                .map(|_| ())
                .ok_or(RepositoryError::NotFound);
        }

        let mut changes = users::ActiveModel::default();
        if let Some(name) = patch.name {
            changes.name = Set(Some(name));
        }
        if let Some(address) = patch.address {
            changes.address = Set(Some(address));
        }
        if let Some(email) = patch.email {
            changes.email = Set(Some(email));
        }
        if let Some(password) = patch.password {
            changes.password = Set(Some(password.into_inner()));
        }

        let result = users::Entity::update_many()
            .set(changes)
            .filter(users::Column::Id.eq(id.value()))
            .exec(txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let row = users::Entity::find_by_id(id.value())
            .find_also_related(credit_cards::Entity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some((user, card)) => {
                let mut photos = self.photos_by_user(vec![user.id]).await?;
                let user_photos = photos.remove(&user.id).unwrap_or_default();
                Ok(Some(to_record(user, card, user_photos)))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self, query: &UserQuery) -> Result<Vec<UserRecord>, RepositoryError> {
        let mut select = users::Entity::find().find_also_related(credit_cards::Entity);

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            select = select.filter(
                Condition::any()
                    .add(contains_ignore_case(users::Column::Name, &pattern))
                    .add(contains_ignore_case(users::Column::Email, &pattern))
                    .add(contains_ignore_case(users::Column::Address, &pattern)),
            );
        }

        let column = match query.order_by {
            OrderBy::Name => users::Column::Name,
            OrderBy::Email => users::Column::Email,
        };
        let order = match query.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let rows = select
            .order_by(column, order)
            .order_by_asc(users::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let ids = rows.iter().map(|(user, _)| user.id).collect();
        let mut photos = self.photos_by_user(ids).await?;

        Ok(rows
            .into_iter()
            .map(|(user, card)| {
                let user_photos = photos.remove(&user.id).unwrap_or_default();
                to_record(user, card, user_photos)
            })
            .collect())
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    domain::{
        error::{DomainError, RepositoryError, ValidationError},
        models::{
            credit_card::CreditCardPatch,
            photo::Upload,
            user::{UserId, UserPatch},
        },
        repositories::{
            credit_card_repository::CreditCardRepository, photo_repository::PhotoRepository,
            user_repository::UserRepository,
        },
        services::{password_service::PasswordHasher, photo_storage::PhotoStorage},
        validation::{
            normalize_card_number, require, validate_card_number, validate_cvv, validate_email,
            validate_expiry,
        },
    },
    usecase::write_support::{
        abort, discard_photos, hash_failure, internal, photo_rows, store_images,
    },
};

/// Card fields to change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CreditCardChanges {
    pub card_type: Option<String>,
    pub number: Option<String>,
    pub holder_name: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    /// An empty password counts as not supplied.
    pub password: Option<String>,
    pub credit_card: CreditCardChanges,
    pub uploads: Vec<Upload>,
}

impl UpdateUserCommand {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            name: None,
            address: None,
            email: None,
            password: None,
            credit_card: CreditCardChanges::default(),
            uploads: Vec::new(),
        }
    }

    /// Present fields must satisfy the same rules as at registration.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(address) = &self.address {
            require("address", address)?;
        }
        if let Some(email) = &self.email {
            validate_email(require("email", email)?)?;
        }

        let card = &self.credit_card;
        if let Some(card_type) = &card.card_type {
            require("creditcard_type", card_type)?;
        }
        if let Some(number) = &card.number {
            validate_card_number(require("creditcard_number", number)?)?;
        }
        if let Some(holder_name) = &card.holder_name {
            require("creditcard_name", holder_name)?;
        }
        if let Some(expiry) = &card.expiry {
            validate_expiry(require("creditcard_expired", expiry)?, now)?;
        }
        if let Some(cvv) = &card.cvv {
            validate_cvv(require("creditcard_cvv", cvv)?)?;
        }
        Ok(())
    }
}

pub struct UpdateUserUsecase<U, C, P, H, S>
where
    U: UserRepository,
    C: CreditCardRepository,
    P: PhotoRepository,
    H: PasswordHasher,
    S: PhotoStorage,
{
    db: DatabaseConnection,
    user_repository: U,
    credit_card_repository: C,
    photo_repository: P,
    password_hasher: H,
    photo_storage: S,
}

impl<U, C, P, H, S> UpdateUserUsecase<U, C, P, H, S>
where
    U: UserRepository,
    C: CreditCardRepository,
    P: PhotoRepository,
    H: PasswordHasher,
    S: PhotoStorage,
{
    pub fn new(
        db: DatabaseConnection,
        user_repository: U,
        credit_card_repository: C,
        photo_repository: P,
        password_hasher: H,
        photo_storage: S,
    ) -> Self {
        Self {
            db,
            user_repository,
            credit_card_repository,
            photo_repository,
            password_hasher,
            photo_storage,
        }
    }

    /// Apply the present fields and append any new photos, all in one transaction.
    pub async fn update(&self, command: UpdateUserCommand) -> Result<(), DomainError>
    where
        U: Send + Sync,
        C: Send + Sync,
        P: Send + Sync,
        H: Send + Sync,
        S: Send + Sync,
    {
        if let Err(e) = command.validate(Utc::now()) {
            tracing::warn!(user_id = %command.user_id, error = %e, "Update rejected");
            return Err(e.into());
        }

        let password = match command.password.as_deref().filter(|p| !p.is_empty()) {
            Some(plain) => Some(self.password_hasher.hash(plain).map_err(hash_failure)?),
            None => None,
        };

        let user_id = command.user_id;
        let user_patch = UserPatch {
            name: command.name,
            address: command.address,
            email: command.email,
            password,
        };
        let card = command.credit_card;
        let card_patch = CreditCardPatch {
            card_type: card.card_type,
            number: card.number.as_deref().map(normalize_card_number),
            holder_name: card.holder_name,
            expiry: card.expiry,
            cvv: card.cvv,
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| internal("Failed to begin transaction", e))?;

        match self.user_repository.update(&txn, user_id, user_patch).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                tracing::warn!(user_id = %user_id, "Update for unknown user");
                return Err(abort(txn, &self.photo_storage, &[], DomainError::UserNotFound).await);
            }
            Err(RepositoryError::DuplicateKey(detail)) => {
                tracing::warn!(user_id = %user_id, %detail, "Update to an email already in use");
                return Err(abort(txn, &self.photo_storage, &[], DomainError::EmailAlreadyUsed).await);
            }
            Err(e) => {
                let error = internal("Failed to update user", e);
                return Err(abort(txn, &self.photo_storage, &[], error).await);
            }
        }

        if let Err(e) = self
            .credit_card_repository
            .update(&txn, user_id, card_patch)
            .await
        {
            let error = internal("Failed to update credit card", e);
            return Err(abort(txn, &self.photo_storage, &[], error).await);
        }

        let mut written = Vec::new();
        if command.uploads.iter().any(Upload::is_image) {
            if let Err(e) =
                store_images(&self.photo_storage, user_id, &command.uploads, &mut written).await
            {
                let error = internal("Failed to store photo", e);
                return Err(abort(txn, &self.photo_storage, &written, error).await);
            }

            if let Err(e) = self
                .photo_repository
                .insert_batch(&txn, photo_rows(user_id, &written))
                .await
            {
                let error = internal("Failed to insert photos", e);
                return Err(abort(txn, &self.photo_storage, &written, error).await);
            }
        }

        if let Err(e) = txn.commit().await {
            discard_photos(&self.photo_storage, &written).await;
            return Err(internal("Failed to commit update", e));
        }

        tracing::info!(user_id = %user_id, new_photos = written.len(), "User updated");
        Ok(())
    }
}

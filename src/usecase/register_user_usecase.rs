use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    domain::{
        error::{DomainError, RepositoryError, ValidationError},
        models::{
            credit_card::NewCreditCard,
            photo::Upload,
            user::{NewUser, UserId},
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

#[derive(Debug, Clone)]
pub struct CreditCardInput {
    pub card_type: String,
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
}

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub name: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub credit_card: CreditCardInput,
    pub uploads: Vec<Upload>,
}

impl RegisterUserCommand {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        validate_email(require("email", &self.email)?)?;
        require("password", &self.password)?;
        require("address", &self.address)?;

        let card = &self.credit_card;
        require("creditcard_type", &card.card_type)?;
        validate_card_number(require("creditcard_number", &card.number)?)?;
        require("creditcard_name", &card.holder_name)?;
        validate_expiry(require("creditcard_expired", &card.expiry)?, now)?;
        validate_cvv(require("creditcard_cvv", &card.cvv)?)?;

        if !self.uploads.iter().any(Upload::is_image) {
            return Err(ValidationError::PhotosRequired);
        }
        Ok(())
    }
}

pub struct RegisterUserUsecase<U, C, P, H, S>
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

impl<U, C, P, H, S> RegisterUserUsecase<U, C, P, H, S>
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

    /// Create a user, its credit card and its photos atomically.
    ///
    /// Photo files written before a later failure are removed again.
    pub async fn register(&self, command: RegisterUserCommand) -> Result<UserId, DomainError>
    where
        U: Send + Sync,
        C: Send + Sync,
        P: Send + Sync,
        H: Send + Sync,
        S: Send + Sync,
    {
        if let Err(e) = command.validate(Utc::now()) {
            tracing::warn!(error = %e, "Registration rejected");
            return Err(e.into());
        }

        let password = self
            .password_hasher
            .hash(&command.password)
            .map_err(hash_failure)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| internal("Failed to begin transaction", e))?;

        let user = NewUser {
            name: command.name,
            address: command.address,
            email: command.email,
            password,
        };
        let user_id = match self.user_repository.insert(&txn, user).await {
            Ok(id) => id,
            Err(RepositoryError::DuplicateKey(detail)) => {
                tracing::warn!(%detail, "Registration with an email already in use");
                return Err(abort(txn, &self.photo_storage, &[], DomainError::EmailAlreadyUsed).await);
            }
            Err(e) => {
                let error = internal("Failed to insert user", e);
                return Err(abort(txn, &self.photo_storage, &[], error).await);
            }
        };

        let card = command.credit_card;
        let card = NewCreditCard {
            user_id,
            card_type: card.card_type,
            number: normalize_card_number(&card.number),
            holder_name: card.holder_name,
            expiry: card.expiry,
            cvv: card.cvv,
        };
        if let Err(e) = self.credit_card_repository.insert(&txn, card).await {
            let error = internal("Failed to insert credit card", e);
            return Err(abort(txn, &self.photo_storage, &[], error).await);
        }

        let mut written = Vec::new();
        if let Err(e) = store_images(&self.photo_storage, user_id, &command.uploads, &mut written).await {
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

        if let Err(e) = txn.commit().await {
            discard_photos(&self.photo_storage, &written).await;
            return Err(internal("Failed to commit registration", e));
        }

        tracing::info!(user_id = %user_id, photos = written.len(), "User registered");
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;
    use rstest::*;
    use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        domain::models::{
            credential::HashedPassword, credit_card::CreditCardPatch, photo::NewPhoto,
        },
        infrastructure::{
            argon2_password_hasher::Argon2PasswordHasher,
            credit_card_repository::SeaOrmCreditCardRepository,
            entity::{credit_cards, photos, users},
            local_photo_storage::LocalPhotoStorage,
            photo_repository::SeaOrmPhotoRepository,
            user_repository::SeaOrmUserRepository,
        },
        test_support::{count_files, count_rows, image, register_command, test_db, text_file},
    };

    #[derive(Clone)]
    struct FailingCreditCardRepository;

    #[async_trait]
    impl CreditCardRepository for FailingCreditCardRepository {
        async fn insert(
            &self,
            _txn: &DatabaseTransaction,
            _card: NewCreditCard,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::DatabaseError("card insert failed".to_string()))
        }

        async fn update(
            &self,
            _txn: &DatabaseTransaction,
            _user_id: UserId,
            _patch: CreditCardPatch,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::DatabaseError("card update failed".to_string()))
        }
    }

    #[derive(Clone)]
    struct FailingPhotoRepository;

    #[async_trait]
    impl PhotoRepository for FailingPhotoRepository {
        async fn insert_batch(
            &self,
            _txn: &DatabaseTransaction,
            _photos: Vec<NewPhoto>,
        ) -> Result<(), RepositoryError> {
            Err(RepositoryError::DatabaseError("photo batch failed".to_string()))
        }
    }

    struct Harness {
        db: DatabaseConnection,
        photo_dir: TempDir,
    }

    impl Harness {
        fn usecase<C, P>(
            &self,
            credit_cards: C,
            photos: P,
        ) -> RegisterUserUsecase<SeaOrmUserRepository, C, P, Argon2PasswordHasher, LocalPhotoStorage>
        where
            C: CreditCardRepository,
            P: PhotoRepository,
        {
            RegisterUserUsecase::new(
                self.db.clone(),
                SeaOrmUserRepository::new(self.db.clone()),
                credit_cards,
                photos,
                Argon2PasswordHasher::new(),
                LocalPhotoStorage::new(self.photo_dir.path()),
            )
        }

        async fn assert_nothing_persisted(&self) {
            assert_eq!(count_rows::<users::Entity>(&self.db).await, 0);
            assert_eq!(count_rows::<credit_cards::Entity>(&self.db).await, 0);
            assert_eq!(count_rows::<photos::Entity>(&self.db).await, 0);
            assert_eq!(count_files(self.photo_dir.path()), 0);
        }
    }

    #[fixture]
    async fn harness() -> Harness {
        Harness {
            db: test_db().await,
            photo_dir: TempDir::new().unwrap(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_persists_user_card_and_photos(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let user_id = usecase
            .register(register_command("Ada", "ada@example.com"))
            .await
            .unwrap();

        let user = users::Entity::find_by_id(user_id.value())
            .one(&harness.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        let stored_password = user.password.unwrap();
        assert_ne!(stored_password, "s3cret-pass");
        assert!(stored_password.starts_with("$argon2"));

        let card = credit_cards::Entity::find_by_id(user_id.value())
            .one(&harness.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(card.number.as_deref(), Some("4111111111111111"));
        assert_eq!(card.cvv.as_deref(), Some("123"));

        assert_eq!(count_rows::<photos::Entity>(&harness.db).await, 1);
        assert_eq!(count_files(&harness.photo_dir.path().join(user_id.to_string())), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_skips_non_image_uploads(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let mut command = register_command("Ada", "ada@example.com");
        command.uploads = vec![text_file("notes.txt"), image("a.png"), image("b.png")];

        usecase.register(command).await.unwrap();

        assert_eq!(count_rows::<photos::Entity>(&harness.db).await, 2);
        assert_eq!(count_files(harness.photo_dir.path()), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_requires_an_image(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let mut command = register_command("Ada", "ada@example.com");
        command.uploads = vec![text_file("notes.txt")];

        let err = usecase.register(command).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidInput(ValidationError::PhotosRequired)
        ));
        harness.assert_nothing_persisted().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_register_rejects_invalid_input_without_side_effects(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let mut command = register_command("Ada", "not-an-email");
        command.credit_card.cvv = "12".to_string();

        let err = usecase.register(command).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidInput(ValidationError::InvalidEmail)
        ));
        harness.assert_nothing_persisted().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_duplicate_email_sequential(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        usecase
            .register(register_command("Ada", "ada@example.com"))
            .await
            .unwrap();
        let err = usecase
            .register(register_command("Another Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::EmailAlreadyUsed));
        assert_eq!(count_rows::<users::Entity>(&harness.db).await, 1);
        assert_eq!(count_rows::<credit_cards::Entity>(&harness.db).await, 1);
        assert_eq!(count_rows::<photos::Entity>(&harness.db).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_duplicate_email_concurrent(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let (first, second) = tokio::join!(
            usecase.register(register_command("Ada", "ada@example.com")),
            usecase.register(register_command("Ada Two", "ada@example.com")),
        );

        let successes = [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);
        let failure = first.err().or(second.err()).unwrap();
        assert!(matches!(
            failure,
            DomainError::EmailAlreadyUsed | DomainError::Internal(_)
        ));
        assert_eq!(count_rows::<users::Entity>(&harness.db).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_credit_card_failure_rolls_back_user(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(FailingCreditCardRepository, SeaOrmPhotoRepository::new());

        let err = usecase
            .register(register_command("Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(
            err.to_string(),
            "Something went wrong. Please try again later."
        );
        harness.assert_nothing_persisted().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_photo_batch_failure_rolls_back_and_removes_files(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), FailingPhotoRepository);

        let mut command = register_command("Ada", "ada@example.com");
        command.uploads = vec![image("a.png"), image("b.jpg")];

        let err = usecase.register(command).await.unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
        harness.assert_nothing_persisted().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_photo_write_failure_rolls_back(#[future] harness: Harness) {
        let harness = harness.await;
        let blocked_root = harness.photo_dir.path().join("blocked");
        std::fs::write(&blocked_root, b"not a directory").unwrap();
        let usecase = RegisterUserUsecase::new(
            harness.db.clone(),
            SeaOrmUserRepository::new(harness.db.clone()),
            SeaOrmCreditCardRepository::new(),
            SeaOrmPhotoRepository::new(),
            Argon2PasswordHasher::new(),
            LocalPhotoStorage::new(&blocked_root),
        );

        let err = usecase
            .register(register_command("Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(count_rows::<users::Entity>(&harness.db).await, 0);
        assert_eq!(count_rows::<credit_cards::Entity>(&harness.db).await, 0);
    }

    #[derive(Clone)]
    struct FailingPasswordHasher;

    impl PasswordHasher for FailingPasswordHasher {
        fn hash(&self, _plain_password: &str) -> Result<HashedPassword, DomainError> {
            Err(DomainError::Internal("salt rejected".to_string()))
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_hash_failure_is_internal_with_cause(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = RegisterUserUsecase::new(
            harness.db.clone(),
            SeaOrmUserRepository::new(harness.db.clone()),
            SeaOrmCreditCardRepository::new(),
            SeaOrmPhotoRepository::new(),
            FailingPasswordHasher,
            LocalPhotoStorage::new(harness.photo_dir.path()),
        );

        let err = usecase
            .register(register_command("Ada", "ada@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            DomainError::Internal(detail) if detail == "Failed to hash password: salt rejected"
        ));
        harness.assert_nothing_persisted().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_card_number_separators_are_stripped(#[future] harness: Harness) {
        let harness = harness.await;
        let usecase = harness.usecase(SeaOrmCreditCardRepository::new(), SeaOrmPhotoRepository::new());

        let mut command = register_command("Ada", "ada@example.com");
        command.credit_card.number = "4111 1111-1111 1111".to_string();
        let user_id = usecase.register(command).await.unwrap();

        let card = credit_cards::Entity::find_by_id(user_id.value())
            .one(&harness.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(card.number.as_deref(), Some("4111111111111111"));
    }

    #[test]
    fn test_validate_rejects_card_in_its_expiry_month() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let mut command = register_command("Ada", "ada@example.com");
        command.credit_card.expiry = "10/26".to_string();

        assert_eq!(command.validate(now), Err(ValidationError::InvalidExpiry));
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut command = register_command("Ada", "ada@example.com");
        command.address = "  ".to_string();

        assert_eq!(
            command.validate(now),
            Err(ValidationError::Required("address"))
        );
    }

    #[test]
    fn test_validate_rejects_expired_card() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut command = register_command("Ada", "ada@example.com");
        command.credit_card.expiry = "12/25".to_string();

        assert_eq!(command.validate(now), Err(ValidationError::InvalidExpiry));
    }
}

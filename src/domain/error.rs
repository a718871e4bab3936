use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Email already registered.")]
    EmailAlreadyUsed,

    #[error("User not found.")]
    UserNotFound,

    /// The detail is for logs only; callers see a fixed message.
    #[error("Something went wrong. Please try again later.")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}: cannot be blank.")]
    Required(&'static str),

    #[error("email: must be a valid email address.")]
    InvalidEmail,

    #[error("creditcard_number: must be a valid credit card number.")]
    InvalidCardNumber,

    #[error("creditcard_expired: invalid credit card expired date.")]
    InvalidExpiry,

    #[error("creditcard_cvv: must be 3 or 4 digits.")]
    InvalidCvv,

    #[error("Please provide photos fields.")]
    PhotosRequired,

    #[error("user_id: must be a valid user id.")]
    InvalidUserId,

    #[error("ob: invalid order by.")]
    InvalidOrderBy,

    #[error("sb: invalid sort by.")]
    InvalidSortBy,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

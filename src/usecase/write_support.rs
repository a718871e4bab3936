//! Steps shared by the registration and update flows.

use std::fmt::Display;

use sea_orm::DatabaseTransaction;

use crate::domain::{
    error::{DomainError, StorageError},
    models::{
        photo::{NewPhoto, PhotoReference, Upload},
        user::UserId,
    },
    services::photo_storage::PhotoStorage,
};

/// Log the cause and hide it behind the generic internal error.
pub(crate) fn internal(context: &str, cause: impl Display) -> DomainError {
    tracing::error!(error = %cause, "{}", context);
    DomainError::Internal(format!("{}: {}", context, cause))
}

/// Log a hashing failure with its cause. Other errors pass through untouched.
pub(crate) fn hash_failure(err: DomainError) -> DomainError {
    match err {
        DomainError::Internal(detail) => internal("Failed to hash password", detail),
        other => other,
    }
}

/// Write every image upload for `owner`; anything else is skipped.
///
/// References are pushed to `written` as they succeed so a failure part-way
/// through still reports what needs cleaning up.
pub(crate) async fn store_images<S>(
    storage: &S,
    owner: UserId,
    uploads: &[Upload],
    written: &mut Vec<PhotoReference>,
) -> Result<(), StorageError>
where
    S: PhotoStorage + Sync,
{
    for upload in uploads {
        if !upload.is_image() {
            tracing::debug!(file_name = %upload.file_name, content_type = %upload.content_type, "Skipping non-image upload");
            continue;
        }
        let reference = storage
            .write(owner, &upload.content, &upload.file_name)
            .await?;
        written.push(reference);
    }
    Ok(())
}

pub(crate) fn photo_rows(owner: UserId, references: &[PhotoReference]) -> Vec<NewPhoto> {
    references
        .iter()
        .map(|reference| NewPhoto {
            user_id: owner,
            reference: reference.clone(),
        })
        .collect()
}

/// Remove files written by a failed attempt. Failures are logged only.
pub(crate) async fn discard_photos<S>(storage: &S, written: &[PhotoReference])
where
    S: PhotoStorage + Sync,
{
    for reference in written {
        if let Err(e) = storage.remove(reference).await {
            tracing::warn!(error = %e, reference = reference.as_str(), "Orphaned photo left on disk");
        }
    }
}

/// Roll back, then remove any files written during the attempt, and hand back `error`.
pub(crate) async fn abort<S>(
    txn: DatabaseTransaction,
    storage: &S,
    written: &[PhotoReference],
    error: DomainError,
) -> DomainError
where
    S: PhotoStorage + Sync,
{
    if let Err(e) = txn.rollback().await {
        tracing::error!(error = %e, "Rollback failed");
    }
    discard_photos(storage, written).await;
    error
}

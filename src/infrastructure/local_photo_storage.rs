use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::domain::{
    error::StorageError,
    models::{photo::PhotoReference, user::UserId},
    services::photo_storage::PhotoStorage,
};

/// Stores photos on the local filesystem as `<root>/<user id>/<token>.<ext>`.
#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    root: PathBuf,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &PhotoReference) -> PathBuf {
        reference
            .as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

/// Time-ordered unique name that keeps the original extension.
fn stored_file_name(original_name: &str) -> String {
    let token = Uuid::now_v7().simple().to_string();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", token, ext.to_ascii_lowercase()),
        None => token,
    }
}

async fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn write(
        &self,
        owner: UserId,
        content: &[u8],
        original_name: &str,
    ) -> Result<PhotoReference, StorageError> {
        let dir = self.root.join(owner.to_string());
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::Write {
                path: dir.display().to_string(),
                source,
            })?;

        let file_name = stored_file_name(original_name);
        let path = dir.join(&file_name);

        if let Err(source) = write_file(&path, content).await {
            // Don't leave a truncated file behind.
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::Write {
                path: path.display().to_string(),
                source,
            });
        }

        tracing::debug!(path = %path.display(), bytes = content.len(), "Photo written");
        Ok(PhotoReference::new(format!("{}/{}", owner, file_name)))
    }

    async fn remove(&self, reference: &PhotoReference) -> Result<(), StorageError> {
        let path = self.resolve(reference);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

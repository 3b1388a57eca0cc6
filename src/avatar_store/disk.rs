/// Disk-based avatar storage backend
use crate::{
    avatar_store::{sanitize_file_name, AvatarBackend, UPLOADS_URL_PREFIX},
    error::{ApiError, ApiResult},
    metrics,
};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs;

/// Disk storage backend
///
/// Files land flat in the uploads directory as `<unix_millis>-<name>`. Two
/// uploads of the same name within one millisecond overwrite each other.
#[derive(Clone)]
pub struct DiskAvatarBackend {
    base_path: PathBuf,
}

impl DiskAvatarBackend {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn stored_name(original_name: &str) -> String {
        format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        )
    }

    /// Map a public path back onto the uploads directory, refusing anything
    /// that is not a plain file name under the prefix
    fn local_path(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(UPLOADS_URL_PREFIX)?
            .strip_prefix('/')?;
        if name.is_empty() || sanitize_file_name(name) != name {
            return None;
        }
        Some(self.base_path.join(name))
    }
}

#[async_trait]
impl AvatarBackend for DiskAvatarBackend {
    async fn put(&self, original_name: &str, data: &[u8]) -> ApiResult<String> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            ApiError::Upload(format!("Failed to create uploads directory: {}", e))
        })?;

        let name = Self::stored_name(original_name);
        let path = self.base_path.join(&name);

        fs::write(&path, data)
            .await
            .map_err(|e| ApiError::Upload(format!("Failed to write avatar {}: {}", name, e)))?;

        metrics::record_avatar_upload();
        tracing::debug!(file = %name, bytes = data.len(), "avatar stored");

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, name))
    }

    async fn delete(&self, public_path: &str) -> ApiResult<()> {
        let Some(path) = self.local_path(public_path) else {
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Upload(format!(
                "Failed to delete avatar {}: {}",
                public_path, e
            ))),
        }
    }
}

/// Avatar Storage
///
/// Stores uploaded creator avatars and hands back the public URL path they
/// are served under.

pub mod disk;

pub use disk::DiskAvatarBackend;

use crate::error::ApiResult;
use async_trait::async_trait;

/// URL prefix uploads are served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Avatar storage backend trait
#[async_trait]
pub trait AvatarBackend: Send + Sync {
    /// Store the bytes and return the public path, e.g. `/uploads/<name>`
    async fn put(&self, original_name: &str, data: &[u8]) -> ApiResult<String>;

    /// Remove a previously stored avatar by its public path. Unknown paths are ignored.
    async fn delete(&self, public_path: &str) -> ApiResult<()>;
}

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`, never empty and
/// never a relative path component.
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on some platforms send full paths
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "avatar".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("face.png"), "face.png");
        assert_eq!(sanitize_file_name("my face (1).png"), "my_face__1_.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\pic.jpg"), "pic.jpg");
        assert_eq!(sanitize_file_name(".."), "avatar");
        assert_eq!(sanitize_file_name(""), "avatar");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }
}

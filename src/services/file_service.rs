use crate::config::Config;
use crate::error::{AppError, AppResult};
use std::path::PathBuf;
use uuid::Uuid;

pub struct FileService {
    upload_dir: PathBuf,
}

impl FileService {
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }

    /// Écrit le fichier sous `<upload_dir>/<folder>/<uuid>.<ext>` et renvoie
    /// l'URL relative servie par le routeur statique.
    pub async fn save_file(
        &self,
        folder: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> AppResult<String> {
        let extension = sanitize_extension(file_name);
        let name = format!("{}.{}", Uuid::new_v4(), extension);

        let dir = self.upload_dir.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::File(e.to_string()))?;

        tokio::fs::write(dir.join(&name), data)
            .await
            .map_err(|e| AppError::File(e.to_string()))?;

        Ok(format!("/uploads/{}/{}", folder, name))
    }

    pub async fn delete_file(&self, url: &str) -> AppResult<()> {
        let relative = url
            .strip_prefix("/uploads/")
            .ok_or_else(|| AppError::File("URL de fichier invalide".to_string()))?;

        tokio::fs::remove_file(self.upload_dir.join(relative))
            .await
            .map_err(|e| AppError::File(e.to_string()))?;

        Ok(())
    }
}

// Le nom vient du client : on ne garde de l'extension que l'alphanumérique.
fn sanitize_extension(file_name: &str) -> String {
    let ext: String = file_name
        .rsplit('.')
        .next()
        .unwrap_or("bin")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();

    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext.to_lowercase()
    }
}

pub fn validate_image_content_type(content_type: &str) -> bool {
    matches!(
        content_type,
        "image/jpeg" | "image/png" | "image/gif" | "image/webp"
    )
}

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("photo.JPG"), "jpg");
        assert_eq!(sanitize_extension("archive.tar.gz"), "gz");
        assert_eq!(sanitize_extension("fichier."), "bin");
        assert_eq!(sanitize_extension("../../etc/passwd"), "etcpassw");
    }

    #[test]
    fn test_validate_image_content_type() {
        assert!(validate_image_content_type("image/jpeg"));
        assert!(validate_image_content_type("image/webp"));
        assert!(!validate_image_content_type("application/pdf"));
        assert!(!validate_image_content_type("text/html"));
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UploadPhase {
    #[default]
    Idle,
    Selected,
    Uploading { percent: u8 },
    Succeeded,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadCandidate {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::General(format!("invalid upload path: {}", path.display()))
            })?;
        let mime_type = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .and_then(|ext| mime_guess::from_ext(&ext).first())
            .map(|m| m.to_string())
            .unwrap_or_else(|| FALLBACK_MIME.to_string());
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn from_path_reads_name_mime_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not a real png")
            .unwrap();

        let candidate = UploadCandidate::from_path(&path).await.unwrap();

        assert_eq!(candidate.name, "shot.png");
        assert_eq!(candidate.mime_type, "image/png");
        assert_eq!(candidate.bytes, b"not a real png");
        assert_eq!(candidate.size(), 14);
    }

    #[tokio::test]
    async fn from_path_falls_back_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noext");
        std::fs::File::create(&path).unwrap().write_all(b"x").unwrap();

        let candidate = UploadCandidate::from_path(&path).await.unwrap();

        assert_eq!(candidate.mime_type, FALLBACK_MIME);
    }

    #[tokio::test]
    async fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadCandidate::from_path(dir.path().join("absent.jpg")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn phase_serializes_with_tag() {
        let phase = UploadPhase::Uploading { percent: 42 };
        let value = serde_json::to_value(&phase).unwrap();
        assert_eq!(value["phase"], "uploading");
        assert_eq!(value["percent"], 42);
    }
}

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::models::upload::UploadCandidate;

pub mod http;
pub mod media;

pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashState {
    pub is_trash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Minimal contract against the remote metadata service. The store is the
/// system of record: callers apply the values these methods return, never
/// their own assumed toggles.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn list(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<FileEntry>, AppError>;

    async fn patch_star(&self, file_id: &str) -> Result<FileEntry, AppError>;

    async fn patch_trash(&self, file_id: &str) -> Result<TrashState, AppError>;

    async fn delete(&self, file_id: &str) -> Result<DeleteOutcome, AppError>;

    async fn delete_trash_all(&self, user_id: &str) -> Result<(), AppError>;

    async fn create_folder(
        &self,
        name: &str,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<FileEntry, AppError>;

    async fn upload(
        &self,
        candidate: &UploadCandidate,
        user_id: &str,
        parent_id: Option<&str>,
        on_progress: Option<ProgressFn>,
    ) -> Result<FileEntry, AppError>;
}

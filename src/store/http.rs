use async_trait::async_trait;

use crate::error::AppError;
use crate::models::file_entry::FileEntry;
use crate::models::upload::UploadCandidate;
use crate::store::{DeleteOutcome, MetadataStore, ProgressFn, TrashState};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;
const ERROR_BODY_LIMIT: usize = 200;

pub struct HttpMetadataStore {
    client: reqwest::Client,
    api_base: String,
}

impl HttpMetadataStore {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}

async fn transport_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    AppError::Transport(format!("{status}: {detail}"))
}

/// Wraps the payload into a chunked stream so the transfer reports
/// (bytesSent, bytesTotal) as the body is consumed.
fn progress_body(bytes: Vec<u8>, on_progress: Option<ProgressFn>) -> reqwest::Body {
    let total = bytes.len() as u64;
    let stream = futures_util::stream::unfold(
        (bytes, 0usize, on_progress),
        move |(bytes, offset, on_progress)| async move {
            if offset >= bytes.len() {
                return None;
            }
            let end = (offset + UPLOAD_CHUNK_BYTES).min(bytes.len());
            let chunk = bytes[offset..end].to_vec();
            if let Some(ref progress) = on_progress {
                progress(end as u64, total);
            }
            Some((
                Ok::<_, std::convert::Infallible>(chunk),
                (bytes, end, on_progress),
            ))
        },
    );
    reqwest::Body::wrap_stream(stream)
}

#[async_trait]
impl MetadataStore for HttpMetadataStore {
    async fn list(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<FileEntry>, AppError> {
        let mut query = vec![("userId", user_id)];
        if let Some(parent) = parent_id {
            query.push(("parentId", parent));
        }
        let response = self
            .client
            .get(self.url("/files"))
            .query(&query)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn patch_star(&self, file_id: &str) -> Result<FileEntry, AppError> {
        let response = self
            .client
            .patch(self.url(&format!("/files/{file_id}/star")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn patch_trash(&self, file_id: &str) -> Result<TrashState, AppError> {
        let response = self
            .client
            .patch(self.url(&format!("/files/{file_id}/trash")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, file_id: &str) -> Result<DeleteOutcome, AppError> {
        let response = self
            .client
            .delete(self.url(&format!("/files/{file_id}/delete")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn delete_trash_all(&self, user_id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url("/files/empty-trash"))
            .query(&[("userId", user_id)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(())
    }

    async fn create_folder(
        &self,
        name: &str,
        user_id: &str,
        parent_id: Option<&str>,
    ) -> Result<FileEntry, AppError> {
        let body = match parent_id {
            Some(parent) => serde_json::json!({
                "name": name,
                "userId": user_id,
                "parentId": parent,
            }),
            None => serde_json::json!({
                "name": name,
                "userId": user_id,
            }),
        };
        let response = self
            .client
            .post(self.url("/folders/create"))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn upload(
        &self,
        candidate: &UploadCandidate,
        user_id: &str,
        parent_id: Option<&str>,
        on_progress: Option<ProgressFn>,
    ) -> Result<FileEntry, AppError> {
        let total = candidate.size();
        if let Some(ref progress) = on_progress {
            progress(0, total);
        }

        let body = progress_body(candidate.bytes.clone(), on_progress);
        let part = reqwest::multipart::Part::stream_with_length(body, total)
            .file_name(candidate.name.clone())
            .mime_str(&candidate.mime_type)?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("userId", user_id.to_string());
        if let Some(parent) = parent_id {
            form = form.text("parentId", parent.to_string());
        }

        let response = self
            .client
            .post(self.url("/files/upload"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(transport_error(response).await);
        }
        Ok(response.json().await?)
    }
}

use crate::error::AppError;
use crate::models::file_entry::FileEntry;

/// Full-quality original, used for downloads.
pub const DOWNLOAD_PARAMS: &str = "tr:q-100,orig-true";
/// Bounded viewer rendition, used for image previews.
pub const PREVIEW_PARAMS: &str = "tr:q-90,w-1600,h-1200,fo-auto";

pub struct MediaClient {
    client: reqwest::Client,
    media_base: String,
}

impl MediaClient {
    pub fn new(media_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            media_base: media_base.into(),
        }
    }

    /// The CDN resolves `{base}/{params}/{storagePath}`.
    pub fn transformed_url(&self, storage_path: &str, params: &str) -> String {
        let path = storage_path.trim_start_matches('/');
        format!("{}/{params}/{path}", self.media_base)
    }

    /// Images download through the transformation endpoint; other files are
    /// served from their stored URL; folders have nothing to download.
    pub fn download_url(&self, entry: &FileEntry) -> Option<String> {
        if entry.is_image() {
            entry
                .storage_path()
                .map(|path| self.transformed_url(path, DOWNLOAD_PARAMS))
        } else {
            entry.serving_url().map(|url| url.to_string())
        }
    }

    pub fn preview_url(&self, entry: &FileEntry) -> Option<String> {
        if !entry.is_image() {
            return None;
        }
        entry
            .storage_path()
            .map(|path| self.transformed_url(path, PREVIEW_PARAMS))
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "{}: media fetch failed",
                response.status()
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn fetch_path(&self, storage_path: &str, params: &str) -> Result<Vec<u8>, AppError> {
        self.fetch(&self.transformed_url(storage_path, params)).await
    }

    pub async fn download(&self, entry: &FileEntry) -> Result<Vec<u8>, AppError> {
        let url = self
            .download_url(entry)
            .ok_or_else(|| AppError::General(format!("not downloadable: {}", entry.name)))?;
        self.fetch(&url).await
    }
}

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::config::VaultConfig;
use crate::error::AppError;
use crate::events::{self, EventSender, VaultEvent};
use crate::models::file_entry::{FileEntry, FileView, ViewCounts};
use crate::models::upload::{UploadCandidate, UploadPhase};
use crate::services::navigation_service::Crumb;
use crate::services::upload_service::{progress_percent, validate_folder_name};
use crate::state::VaultState;
use crate::store::http::HttpMetadataStore;
use crate::store::media::MediaClient;
use crate::store::{MetadataStore, ProgressFn};

/// One user's live vault: cache, navigator, and upload pipeline behind a
/// single handle, with every mutation reconciled against the store's
/// responses. Operations report state changes on the event channel returned
/// by the constructor.
pub struct VaultSession {
    user_id: String,
    store: Arc<dyn MetadataStore>,
    media: Option<MediaClient>,
    state: Arc<VaultState>,
    events: EventSender,
}

impl VaultSession {
    pub fn new(
        config: VaultConfig,
        store: Arc<dyn MetadataStore>,
    ) -> (Self, UnboundedReceiver<VaultEvent>) {
        let (events, receiver) = events::channel();
        let session = Self {
            user_id: config.user_id,
            store,
            media: config.media_base.map(MediaClient::new),
            state: Arc::new(VaultState::new()),
            events,
        };
        (session, receiver)
    }

    /// Builds a session backed by the HTTP metadata store.
    pub fn connect(config: VaultConfig) -> (Self, UnboundedReceiver<VaultEvent>) {
        let store = Arc::new(HttpMetadataStore::new(config.api_base.clone()));
        Self::new(config, store)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn current_folder_id(&self) -> Option<String> {
        self.state.current_scope()
    }

    pub fn breadcrumb(&self) -> Vec<Crumb> {
        self.state.lock_nav().breadcrumb().to_vec()
    }

    pub fn entries(&self, view: FileView) -> Vec<FileEntry> {
        self.state.lock_entries().view(view)
    }

    pub fn entry(&self, id: &str) -> Option<FileEntry> {
        self.state.lock_entries().get(id).cloned()
    }

    pub fn counts(&self) -> ViewCounts {
        self.state.lock_entries().counts()
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.state.lock_upload().phase()
    }

    /// Reloads the entry cache for the folder the navigator currently points
    /// at.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let scope = self.state.current_scope();
        self.fetch_scope(scope).await
    }

    /// Fetches one folder's children and installs them, unless the navigator
    /// moved on while the request was in flight. A stale listing is dropped
    /// so it cannot clobber the newer scope.
    async fn fetch_scope(&self, scope: Option<String>) -> Result<(), AppError> {
        let entries = self.store.list(&self.user_id, scope.as_deref()).await?;

        let nav = self.state.lock_nav();
        if nav.current_folder_id() != scope.as_deref() {
            drop(nav);
            warn!(
                requested = scope.as_deref().unwrap_or("root"),
                "discarding stale listing"
            );
            self.events
                .send(VaultEvent::ScopeDiscarded { folder_id: scope });
            return Ok(());
        }
        let entry_count = entries.len();
        self.state.lock_entries().replace_all(entries);
        drop(nav);

        debug!(
            folder = scope.as_deref().unwrap_or("root"),
            entry_count, "scope loaded"
        );
        self.events.send(VaultEvent::ScopeLoaded {
            folder_id: scope,
            entry_count,
        });
        Ok(())
    }

    /// Enters a child folder and loads its entries. The crumb is pushed
    /// before the fetch so a slower response for the old folder cannot land
    /// in the new one.
    pub async fn navigate_into(
        &self,
        folder_id: impl Into<String>,
        folder_name: impl Into<String>,
    ) -> Result<(), AppError> {
        let folder_id = folder_id.into();
        {
            let mut nav = self.state.lock_nav();
            nav.navigate_into(folder_id.clone(), folder_name);
        }
        self.fetch_scope(Some(folder_id)).await
    }

    /// Steps to the parent folder. At root this is a no-op and no fetch is
    /// issued.
    pub async fn navigate_up(&self) -> Result<(), AppError> {
        let scope = {
            let mut nav = self.state.lock_nav();
            if !nav.navigate_up() {
                return Ok(());
            }
            nav.current_folder_id().map(|id| id.to_string())
        };
        self.fetch_scope(scope).await
    }

    /// Jumps to a breadcrumb index, -1 meaning root. Out-of-range indexes
    /// neither move nor fetch.
    pub async fn navigate_to_index(&self, index: isize) -> Result<(), AppError> {
        let scope = {
            let mut nav = self.state.lock_nav();
            if !nav.navigate_to_index(index) {
                return Ok(());
            }
            nav.current_folder_id().map(|id| id.to_string())
        };
        self.fetch_scope(scope).await
    }

    /// Flips the star flag server-side and applies the value the store
    /// returns. The cache is only touched once the store has answered; on
    /// failure it is left as it was.
    pub async fn toggle_star(&self, id: &str) -> Result<bool, AppError> {
        let updated = self.store.patch_star(id).await?;
        let is_starred = updated.is_starred;
        self.state.lock_entries().set_starred(&updated.id, is_starred);
        debug!(id = %updated.id, is_starred, "star flag applied");
        self.events.send(VaultEvent::EntryStarred {
            id: updated.id,
            is_starred,
        });
        Ok(is_starred)
    }

    /// Moves an entry into or out of the trash, whichever the store decides.
    /// The entry stays in the cache either way; only delete operations remove
    /// entries.
    pub async fn toggle_trash(&self, id: &str) -> Result<bool, AppError> {
        let patched = self.store.patch_trash(id).await?;
        self.state.lock_entries().set_trash(id, patched.is_trash);
        debug!(id, is_trash = patched.is_trash, "trash flag applied");
        self.events.send(VaultEvent::EntryTrashed {
            id: id.to_string(),
            is_trash: patched.is_trash,
        });
        Ok(patched.is_trash)
    }

    /// Deletes a trashed entry for good. The entry leaves the cache only
    /// when the store acknowledges the delete; a `success:false` reply keeps
    /// it in place.
    pub async fn permanently_delete(&self, id: &str) -> Result<(), AppError> {
        let outcome = self.store.delete(id).await?;
        if !outcome.success {
            return Err(AppError::Logic(
                outcome
                    .error
                    .unwrap_or_else(|| format!("delete rejected for {id}")),
            ));
        }
        self.state.lock_entries().remove(id);
        info!(id, "entry permanently deleted");
        self.events.send(VaultEvent::EntryDeleted { id: id.to_string() });
        Ok(())
    }

    /// Empties the trash. Only entries that were trashed when the call was
    /// issued are removed from the cache, and the returned count covers that
    /// snapshot; anything trashed mid-flight is reconciled by the next
    /// refetch.
    pub async fn empty_trash(&self) -> Result<usize, AppError> {
        let snapshot = self.state.lock_entries().trashed_ids();
        self.store.delete_trash_all(&self.user_id).await?;
        let removed = snapshot.len();
        self.state.lock_entries().remove_many(&snapshot);
        info!(removed, "trash emptied");
        self.events.send(VaultEvent::TrashEmptied { removed });
        Ok(removed)
    }

    /// Creates a folder in the current scope, then refetches the listing.
    /// The new folder reaches the cache through the refetch rather than an
    /// optimistic insert.
    pub async fn create_folder(&self, name: &str) -> Result<FileEntry, AppError> {
        let name = validate_folder_name(name)?;
        let parent = self.state.current_scope();
        let folder = self
            .store
            .create_folder(&name, &self.user_id, parent.as_deref())
            .await?;
        info!(id = %folder.id, name = %folder.name, "folder created");
        self.events.send(VaultEvent::FolderCreated {
            id: folder.id.clone(),
            name: folder.name.clone(),
        });
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "refetch after folder create failed");
        }
        Ok(folder)
    }

    /// Stages a candidate for upload. Oversize candidates are rejected here,
    /// before any network activity.
    pub fn select_upload(&self, candidate: UploadCandidate) -> Result<(), AppError> {
        self.state.lock_upload().select(candidate)
    }

    pub fn clear_upload(&self) {
        self.state.lock_upload().clear();
    }

    /// Transmits the staged candidate into the current folder, reporting
    /// progress through the pipeline and the event channel. On success the
    /// listing is refetched and the pipeline returns to idle; on failure the
    /// candidate is retained so the caller may retry or clear.
    pub async fn start_upload(&self) -> Result<FileEntry, AppError> {
        let candidate = self.state.lock_upload().begin()?;
        let parent = self.state.current_scope();

        let progress_state = Arc::clone(&self.state);
        let progress_events = self.events.clone();
        let on_progress: ProgressFn = Box::new(move |sent, total| {
            let percent = progress_percent(sent, total);
            progress_state.lock_upload().set_progress(percent);
            progress_events.send(VaultEvent::UploadProgress { percent });
        });

        match self
            .store
            .upload(&candidate, &self.user_id, parent.as_deref(), Some(on_progress))
            .await
        {
            Ok(entry) => {
                self.state.lock_upload().finish_success();
                info!(id = %entry.id, name = %entry.name, "upload finished");
                self.events.send(VaultEvent::UploadSucceeded {
                    entry_id: entry.id.clone(),
                });
                if let Err(err) = self.refresh().await {
                    warn!(error = %err, "refetch after upload failed");
                }
                self.state.lock_upload().clear();
                Ok(entry)
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                self.state.lock_upload().finish_failure(err.to_string());
                self.events.send(VaultEvent::UploadFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub fn media(&self) -> Option<&MediaClient> {
        self.media.as_ref()
    }

    /// Preview URL for a cached image entry, if the entry has one.
    pub fn preview_url(&self, id: &str) -> Result<Option<String>, AppError> {
        let media = self.media_client()?;
        let entry = self.entry_or_err(id)?;
        Ok(media.preview_url(&entry))
    }

    /// Fetches the full-quality bytes for a downloadable entry in the
    /// current scope.
    pub async fn download(&self, id: &str) -> Result<Vec<u8>, AppError> {
        let media = self.media_client()?;
        let entry = self.entry_or_err(id)?;
        if !entry.can_download() {
            return Err(AppError::General(format!("not downloadable: {}", entry.name)));
        }
        media.download(&entry).await
    }

    fn media_client(&self) -> Result<&MediaClient, AppError> {
        self.media
            .as_ref()
            .ok_or_else(|| AppError::General("no media base configured".to_string()))
    }

    fn entry_or_err(&self, id: &str) -> Result<FileEntry, AppError> {
        self.entry(id)
            .ok_or_else(|| AppError::General(format!("no entry {id} in the current scope")))
    }
}

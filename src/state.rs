use std::sync::{Mutex, MutexGuard};

use crate::services::cache_service::EntryCache;
use crate::services::navigation_service::Navigator;
use crate::services::upload_service::UploadPipeline;

/// Shared mutable state of one vault session. Locks are never held across an
/// await point, so a store response is applied in one critical section.
pub struct VaultState {
    pub entries: Mutex<EntryCache>,
    pub nav: Mutex<Navigator>,
    pub upload: Mutex<UploadPipeline>,
}

impl VaultState {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(EntryCache::new()),
            nav: Mutex::new(Navigator::new()),
            upload: Mutex::new(UploadPipeline::new()),
        }
    }

    pub fn lock_entries(&self) -> MutexGuard<'_, EntryCache> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lock_nav(&self) -> MutexGuard<'_, Navigator> {
        self.nav
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lock_upload(&self) -> MutexGuard<'_, UploadPipeline> {
        self.upload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current_scope(&self) -> Option<String> {
        self.lock_nav().current_folder_id().map(|id| id.to_string())
    }
}

impl Default for VaultState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn current_scope_follows_the_navigator() {
        let state = VaultState::new();
        assert_eq!(state.current_scope(), None);

        state.lock_nav().navigate_into("d1", "photos");
        assert_eq!(state.current_scope(), Some("d1".to_string()));

        state.lock_nav().navigate_up();
        assert_eq!(state.current_scope(), None);
    }

    #[test]
    fn locks_recover_from_poisoning() {
        let state = Arc::new(VaultState::new());
        let poisoner = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the cache lock");
        })
        .join();

        assert!(state.lock_entries().is_empty());
    }
}

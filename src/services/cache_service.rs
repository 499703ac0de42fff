use crate::models::file_entry::{FileEntry, FileView, ViewCounts};

/// In-memory mirror of the current scope's entries, in store order.
#[derive(Debug, Default)]
pub struct EntryCache {
    entries: Vec<FileEntry>,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn set_starred(&mut self, id: &str, is_starred: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_starred = is_starred;
                true
            }
            None => false,
        }
    }

    pub fn set_trash(&mut self, id: &str, is_trash: bool) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.is_trash = is_trash;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FileEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn remove_many(&mut self, ids: &[String]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !ids.iter().any(|id| id == &entry.id));
        before - self.entries.len()
    }

    pub fn trashed_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.is_trash)
            .map(|entry| entry.id.clone())
            .collect()
    }

    pub fn view(&self, view: FileView) -> Vec<FileEntry> {
        self.entries
            .iter()
            .filter(|entry| view.includes(entry))
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> ViewCounts {
        let mut counts = ViewCounts::default();
        for entry in &self.entries {
            if entry.is_trash {
                counts.trash += 1;
            } else {
                counts.all += 1;
                if entry.is_starred {
                    counts.starred += 1;
                }
            }
        }
        counts
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    #[serde(rename_all = "camelCase")]
    File {
        size: u64,
        mime_type: String,
        storage_path: String,
        serving_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    pub is_starred: bool,
    pub is_trash: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(&self.kind, EntryKind::File { mime_type, .. } if mime_type.starts_with("image/"))
    }

    pub fn size(&self) -> Option<u64> {
        match &self.kind {
            EntryKind::File { size, .. } => Some(*size),
            EntryKind::Folder => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { mime_type, .. } => Some(mime_type),
            EntryKind::Folder => None,
        }
    }

    pub fn storage_path(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { storage_path, .. } => Some(storage_path),
            EntryKind::Folder => None,
        }
    }

    pub fn serving_url(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { serving_url, .. } => Some(serving_url),
            EntryKind::Folder => None,
        }
    }

    pub fn can_download(&self) -> bool {
        self.is_file() && !self.is_trash
    }

    pub fn can_star(&self) -> bool {
        !self.is_trash
    }

    pub fn can_permanently_delete(&self) -> bool {
        self.is_trash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileView {
    All,
    Starred,
    Trash,
}

impl FileView {
    pub fn includes(&self, entry: &FileEntry) -> bool {
        match self {
            Self::All => !entry.is_trash,
            Self::Starred => entry.is_starred && !entry.is_trash,
            Self::Trash => entry.is_trash,
        }
    }
}

impl std::fmt::Display for FileView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Starred => write!(f, "starred"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

impl std::str::FromStr for FileView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "starred" => Ok(Self::Starred),
            "trash" => Ok(Self::Trash),
            _ => Err(format!("unknown file view: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewCounts {
    pub all: usize,
    pub starred: usize,
    pub trash: usize,
}

pub fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{size} B")
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}

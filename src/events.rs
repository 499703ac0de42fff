use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    ScopeLoaded {
        folder_id: Option<String>,
        entry_count: usize,
    },
    ScopeDiscarded {
        folder_id: Option<String>,
    },
    EntryStarred {
        id: String,
        is_starred: bool,
    },
    EntryTrashed {
        id: String,
        is_trash: bool,
    },
    EntryDeleted {
        id: String,
    },
    TrashEmptied {
        removed: usize,
    },
    FolderCreated {
        id: String,
        name: String,
    },
    UploadProgress {
        percent: u8,
    },
    UploadSucceeded {
        entry_id: String,
    },
    UploadFailed {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventSender {
    tx: UnboundedSender<VaultEvent>,
}

impl EventSender {
    /// A dropped receiver never fails the operation that emitted.
    pub fn send(&self, event: VaultEvent) {
        let _ = self.tx.send(event);
    }
}

pub fn channel() -> (EventSender, UnboundedReceiver<VaultEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

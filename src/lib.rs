pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use config::VaultConfig;
pub use error::{AppError, ValidationError};
pub use events::VaultEvent;
pub use models::file_entry::{format_size, EntryKind, FileEntry, FileView, ViewCounts};
pub use models::upload::{UploadCandidate, UploadPhase};
pub use services::cache_service::EntryCache;
pub use services::navigation_service::{Crumb, Navigator};
pub use services::upload_service::{UploadPipeline, MAX_UPLOAD_BYTES};
pub use session::VaultSession;
pub use state::VaultState;
pub use store::http::HttpMetadataStore;
pub use store::media::MediaClient;
pub use store::{DeleteOutcome, MetadataStore, ProgressFn, TrashState};

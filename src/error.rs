use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file size {size} exceeds the {limit} byte upload limit")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("folder name must not be empty")]
    EmptyFolderName,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SizeExceeded { .. } => "size_exceeded",
            Self::EmptyFolderName => "empty_folder_name",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Logic error: {0}")]
    Logic(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    General(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl AppError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TffsError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("short read: wanted {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("no known keys found")]
    NoValues,

    #[error("key '{0}' was not found")]
    KeyNotFound(String),

    #[error("unknown key name '{0}'")]
    UnknownKey(String),

    #[error("invalid key registry: {0}")]
    InvalidRegistry(String),
}

pub type Result<T> = std::result::Result<T, TffsError>;

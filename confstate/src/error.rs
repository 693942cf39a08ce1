use thiserror::Error;

/// Failure reported by a [`Store`](crate::store::Store) backend.
///
/// `NotFound` is the only benign variant: it means the key was never written,
/// which is expected for fields that have not been persisted yet.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key not found: {key}")]
    NotFound { key: String },

    #[error("Key too long ({} > {max}): {key}", .key.len())]
    KeyTooLong { key: String, max: usize },

    #[error("Type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("List too long to persist ({len} elements): {key}")]
    ListTooLong { key: String, len: usize },

    #[error("Store is read-only")]
    ReadOnly,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_key_too_long(&self) -> bool {
        matches!(self, StoreError::KeyTooLong { .. })
    }
}

/// Failure while constructing a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid JSON pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfStateError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConfStateError>;

use crate::records::validation::ValidationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Directory does not exist: {0}")]
    MissingDirectory(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize {collection}: {source}")]
    Serialize {
        collection: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Saving now would overwrite the unreadable files with empty collections
    #[error("Data files failed to load, nothing was saved\n{0}")]
    Unwritable(ValidationResult),

    #[error("{kind} '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

use thiserror::Error;

/// Everything that can go wrong in the BookFinder data layer
#[derive(Error, Debug)]
pub enum Error {
    /// User-facing search failure; the message is shown as-is
    #[error("{0}")]
    SearchError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bookfinder_api::OpenLibraryError> for Error {
    fn from(err: bookfinder_api::OpenLibraryError) -> Self {
        Error::SearchError(err.to_string())
    }
}

impl From<bookfinder_store::StoreError> for Error {
    fn from(err: bookfinder_store::StoreError) -> Self {
        Error::StorageError(err.to_string())
    }
}

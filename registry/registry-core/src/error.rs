use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// The create request was rejected before anything was persisted.
    #[error("invalid token: {0}")]
    Validation(String),
    /// The data file could not be read or the rewrite could not be committed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::StorageUnavailable(err.to_string())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

//! Storage error shared by the remedy and chat history stores.

/// Failure while reading or writing one of the sled-backed stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),

    #[error("record encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned by fakes and wrappers that can't reach the store at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

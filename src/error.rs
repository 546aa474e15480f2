use thiserror::Error;

/// Every failure the booking lifecycle can surface.
///
/// The variants mirror how a caller should react: the first group is the
/// caller's fault and is returned as-is, the second group is an upstream
/// failure whose detail stays server-side.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    /// The referenced entity is absent or not publicly visible.
    #[error("{0}")]
    NotFound(String),
    /// The entity exists but is not in a bookable state.
    #[error("{0}")]
    Unavailable(String),
    /// The caller lacks admin rights.
    #[error("Unauthorized")]
    Unauthorized,
    /// The webhook authenticity check failed.
    #[error("Invalid signature: {0}")]
    Signature(String),
    /// The webhook payload is missing required fields.
    #[error("{0}")]
    MalformedEvent(String),
    /// A required setting is absent at runtime.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The payment provider rejected or failed a request.
    #[error("Payment provider error: {0}")]
    Provider(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

impl MarketError {
    /// Whether the error originates outside the caller's input.
    ///
    /// Upstream errors are logged with their detail and reported to clients
    /// with a generic message.
    pub fn is_upstream(&self) -> bool {
        !matches!(
            self,
            Self::Validation(_)
                | Self::NotFound(_)
                | Self::Unavailable(_)
                | Self::Unauthorized
                | Self::Signature(_)
                | Self::MalformedEvent(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;

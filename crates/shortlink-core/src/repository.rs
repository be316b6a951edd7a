use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping from a short code to its long URL.
///
/// Records are immutable once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The unique short code.
    pub short_code: ShortCode,
    /// The original URL that was shortened.
    pub long_url: String,
    /// When the code was generated, with second precision.
    pub created_at: Timestamp,
}

/// Persistence contract for link records.
///
/// Implementations must never overwrite an existing code.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync + 'static {
    /// Persists a new record.
    ///
    /// Returns `Err(Conflict)` if the code is already taken; any other failure
    /// leaves storage unchanged.
    async fn add_link(&self, record: LinkRecord) -> Result<()>;

    /// Retrieves the record for a given short code.
    ///
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn get_link(&self, code: &ShortCode) -> Result<LinkRecord>;
}

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a [`LinkRepository`][crate::repository::LinkRepository] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors returned by the [`Shortener`][crate::shortener::Shortener] contract.
///
/// Both transports map these to their own status codes, so every variant
/// corresponds to exactly one [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid link: {0}")]
    InvalidLink(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("generate short link timeout after {}ms", .0.as_millis())]
    GenerateTimeout(Duration),
    #[error("link not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl ShortenerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortenerError::InvalidLink(_) => ErrorKind::InvalidLink,
            ShortenerError::InvalidShortCode(_) => ErrorKind::InvalidShortCode,
            ShortenerError::GenerateTimeout(_) => ErrorKind::GenerateTimeout,
            ShortenerError::NotFound(_) => ErrorKind::NotFound,
            ShortenerError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(code) => ShortenerError::NotFound(code),
            other => ShortenerError::Storage(other),
        }
    }
}

/// Transport-independent failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidLink,
    InvalidShortCode,
    GenerateTimeout,
    NotFound,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidLink => "invalid_link",
            ErrorKind::InvalidShortCode => "invalid_short_code",
            ErrorKind::GenerateTimeout => "generate_timeout",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

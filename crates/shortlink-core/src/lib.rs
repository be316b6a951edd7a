//! Core types and traits for the Shortlink URL shortener.
//!
//! This crate holds the domain model shared by the coordination service,
//! the storage backends and both transports: short codes, link records,
//! the long URL validator, the storage contract and the error taxonomy.

pub mod error;
pub mod link;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{ErrorKind, ShortenerError, StorageError};
pub use link::is_valid_long_url;
pub use repository::{LinkRecord, LinkRepository};
pub use shortcode::{ShortCode, SHORT_CODE_ALPHABET, SHORT_CODE_LENGTH};
pub use shortener::Shortener;

#[cfg(any(test, feature = "mock"))]
pub use repository::MockLinkRepository;
#[cfg(any(test, feature = "mock"))]
pub use shortener::MockShortener;

use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// The link coordination contract shared by every transport.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a short code for `long_url` and returns it.
    async fn create_short_link(&self, long_url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the long URL it was created for.
    async fn resolve_short_link(&self, code: &str) -> Result<String>;
}

mod clock;
pub mod random;

pub use clock::{Clock, SystemClock};
pub use random::RandomGenerator;

use jiff::Timestamp;
use shortlink_core::ShortCode;

/// A candidate short code together with the moment it was generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: ShortCode,
    pub created_at: Timestamp,
}

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage,
/// so the codes they produce are candidates, not guaranteed to be unused.
pub trait Generator: Send + Sync + 'static {
    /// Generates a candidate code and the timestamp it was generated at.
    fn generate(&self) -> GeneratedCode;
}

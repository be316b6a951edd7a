use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of symbols in every generated short code.
pub const SHORT_CODE_LENGTH: usize = 10;

/// The 63 symbols a generated short code is drawn from.
pub const SHORT_CODE_ALPHABET: &[u8; 63] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// An identifier for a shortened URL.
///
/// Codes coming from the outside world go through [`ShortCode::parse`], which
/// only enforces the upper length bound. Anything shorter is a legitimate
/// lookup key that simply may not exist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parses an externally supplied short code.
    ///
    /// Fails with [`ShortenerError::InvalidShortCode`] when the code is longer
    /// than [`SHORT_CODE_LENGTH`].
    pub fn parse(code: impl Into<String>) -> std::result::Result<Self, ShortenerError> {
        let code = code.into();
        if code.len() > SHORT_CODE_LENGTH {
            return Err(ShortenerError::InvalidShortCode(format!(
                "length must be at most {}, got {}",
                SHORT_CODE_LENGTH,
                code.len()
            )));
        }
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators or rows read back from storage).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Whether the code has exactly the generated shape: ten symbols from
    /// [`SHORT_CODE_ALPHABET`].
    pub fn is_canonical(&self) -> bool {
        self.0.len() == SHORT_CODE_LENGTH
            && self.0.bytes().all(|b| SHORT_CODE_ALPHABET.contains(&b))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use crate::error::CoreError;
use crate::key::ObjectKey;
use std::fmt::Display;

/// Symbols a short code may contain: the base-36 digits.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a system-generated short code.
pub const GENERATED_LENGTH: usize = 7;

const MIN_LENGTH: usize = 1;
const MAX_LENGTH: usize = 32;

/// A short identifier for a shortened URL.
///
/// Custom codes must be 1-32 characters long and contain only
/// lowercase base-36 digits (`[0-9a-z]`), the same charset the
/// generator draws from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShortCode {
    /// A system-generated short code.
    Generated(String),
    /// A caller-provided short code.
    Custom(String),
}

impl ShortCode {
    /// Creates a generated `ShortCode` without validation.
    ///
    /// Use this only for generator output.
    pub fn generated(code: impl Into<String>) -> Self {
        Self::Generated(code.into())
    }

    /// Creates a caller-provided `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self::Custom(code))
    }

    /// Creates a custom `ShortCode` without validation.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self::Custom(code.into())
    }

    /// Returns `true` if the code came from a generator.
    ///
    /// Only generated codes may be replaced after a collision.
    pub fn is_generated(&self) -> bool {
        matches!(self, ShortCode::Generated(_))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            ShortCode::Generated(s) | ShortCode::Custom(s) => s.as_str(),
        }
    }

    /// Builds the public short URL `https://<cdn_prefix>/<code>`.
    pub fn to_url(&self, cdn_prefix: &str) -> String {
        format!("https://{}/{}", cdn_prefix.trim_end_matches('/'), self)
    }

    /// Builds the storage key `<prefix>/<code>`.
    pub fn object_key(&self, prefix: &str) -> ObjectKey {
        ObjectKey::new(prefix, self)
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only lowercase letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

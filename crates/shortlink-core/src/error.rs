use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors reported by a [`RedirectStore`](crate::RedirectStore) backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// A create-if-absent write found the key already occupied.
    #[error("object already exists: {0}")]
    Conflict(String),
    /// The backend answered with an error code.
    #[error("{code}: {message}")]
    Backend { code: String, message: String },
    /// The backend could not be reached (dispatch failure, timeout).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn backend(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the backend error code, or a fixed code for local variants.
    pub fn code(&self) -> &str {
        match self {
            StorageError::Conflict(_) => "Conflict",
            StorageError::Backend { code, .. } => code,
            StorageError::Unavailable(_) => "Unavailable",
        }
    }

    /// Returns the backend message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            StorageError::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors surfaced by an allocation.
///
/// The `Display` output is the message returned to the caller in the
/// `error` field of the invocation result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocateError {
    #[error("Invalid URL format")]
    InvalidUrl(String),
    #[error("Invalid short id format")]
    InvalidShortId(String),
    #[error("Missing CDN prefix")]
    MissingCdnPrefix,
    #[error("Shortid is already in use")]
    IdAlreadyInUse(String),
    #[error("Could not find a suitable name, error: {code}")]
    StorageProbeFailed { code: String, message: String },
    #[error("{0}")]
    StorageWriteFailed(String),
}

impl From<CoreError> for AllocateError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortId(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_error_messages() {
        assert_eq!(
            AllocateError::InvalidUrl("nope".into()).to_string(),
            "Invalid URL format"
        );
        assert_eq!(
            AllocateError::IdAlreadyInUse("abc".into()).to_string(),
            "Shortid is already in use"
        );
        assert_eq!(
            AllocateError::StorageProbeFailed {
                code: "AccessDenied".into(),
                message: "Access Denied".into(),
            }
            .to_string(),
            "Could not find a suitable name, error: AccessDenied"
        );
        assert_eq!(
            AllocateError::StorageWriteFailed("SlowDown".into()).to_string(),
            "SlowDown"
        );
    }

    #[test]
    fn storage_error_code_and_message() {
        let err = StorageError::backend("AccessDenied", "Access Denied");
        assert_eq!(err.code(), "AccessDenied");
        assert_eq!(err.message(), "Access Denied");
        assert_eq!(err.to_string(), "AccessDenied: Access Denied");

        let err = StorageError::Unavailable("connection reset".into());
        assert_eq!(err.code(), "Unavailable");
        assert_eq!(err.message(), "storage backend unavailable: connection reset");
    }

    #[test]
    fn core_error_maps_to_invalid_short_id() {
        let err: AllocateError = CoreError::InvalidShortCode("bad".into()).into();
        assert!(matches!(err, AllocateError::InvalidShortId(_)));
        assert_eq!(err.to_string(), "Invalid short id format");
    }
}

//! Error types for PolyFAQ.

use thiserror::Error;

/// Library-wide error type.
///
/// Only the client errors ([`FaqError::is_client_error`]) are meant to reach
/// API callers. Provider and language errors are absorbed by the resolver,
/// which degrades to source-language content instead.
#[derive(Debug, Error)]
pub enum FaqError {
    /// Missing or empty required source field on write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation on an entry that does not exist.
    #[error("FAQ not found: {0}")]
    NotFound(u64),

    /// The entry changed between the read and the conditional write.
    #[error("FAQ {0} was modified concurrently")]
    Conflict(u64),

    /// Any failure reported by the translation provider.
    #[error("Translation provider error: {0}")]
    Provider(String),

    /// Language code outside the known registry.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FaqError {
    /// Whether the error is the caller's fault rather than the server's.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }
}

impl From<reqwest::Error> for FaqError {
    fn from(err: reqwest::Error) -> Self {
        FaqError::Provider(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FaqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            FaqError::Validation("question must not be empty".into()).to_string(),
            "Validation error: question must not be empty"
        );
        assert_eq!(FaqError::NotFound(7).to_string(), "FAQ not found: 7");
        assert_eq!(
            FaqError::UnsupportedLanguage("xyz".into()).to_string(),
            "Unsupported language: xyz"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(FaqError::Validation("x".into()).is_client_error());
        assert!(FaqError::NotFound(1).is_client_error());
        assert!(FaqError::Conflict(1).is_client_error());
        assert!(!FaqError::Provider("quota".into()).is_client_error());
        assert!(!FaqError::Config("bad".into()).is_client_error());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FaqError = io.into();
        assert!(matches!(err, FaqError::Io(_)));
    }
}

//! Unified error types for pagesnap

use thiserror::Error;

/// Unified error type for all pagesnap operations
#[derive(Error, Debug)]
pub enum SnapError {
    // Launch errors
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    // Navigation errors
    #[error("Navigation failed: {0}")]
    Navigation(String),

    // Network-idle errors
    #[error("Network did not become idle within {timeout_ms}ms")]
    IdleTimeout { timeout_ms: u64 },

    // Other browser/CDP errors
    #[error("Browser error: {0}")]
    Browser(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using SnapError
pub type Result<T> = std::result::Result<T, SnapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timeout_is_distinguishable() {
        let err = SnapError::IdleTimeout { timeout_ms: 30_000 };
        assert!(matches!(err, SnapError::IdleTimeout { timeout_ms: 30_000 }));
        assert_eq!(
            err.to_string(),
            "Network did not become idle within 30000ms"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SnapError = io.into();
        assert!(matches!(err, SnapError::Io(_)));
    }
}

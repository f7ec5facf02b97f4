//! Error types for cloudfs.

use std::fmt;

use thiserror::Error;

/// Status reported by the remote store when a call does not succeed.
///
/// The core never interprets the code; it is carried back to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    /// Store-specific status code.
    pub code: i32,
    /// Human-readable status message from the store.
    pub message: String,
}

impl RemoteStatus {
    /// Create a new status.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}: {}", self.code, self.message)
    }
}

/// Common error type for cloudfs.
#[derive(Error, Debug)]
pub enum CloudFsError {
    /// A required path segment is not among a folder's children.
    #[error("{0} not found")]
    NotFound(String),

    /// A path that cannot name what the operation needs.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A remote store call reported a non-success status.
    #[error("remote store failure: {0}")]
    Remote(RemoteStatus),

    /// Copying upload bytes into the remote content sink failed.
    #[error("transport error: {0}")]
    Transport(std::io::Error),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CloudFsError {
    /// Returns the remote status if this error came from the store.
    pub fn remote_status(&self) -> Option<&RemoteStatus> {
        match self {
            CloudFsError::Remote(status) => Some(status),
            _ => None,
        }
    }

    /// Whether this is a path-resolution miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudFsError::NotFound(_))
    }
}

impl From<RemoteStatus> for CloudFsError {
    fn from(status: RemoteStatus) -> Self {
        CloudFsError::Remote(status)
    }
}

/// Result type alias for cloudfs operations.
pub type Result<T> = std::result::Result<T, CloudFsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CloudFsError::NotFound("photos".to_string());
        assert_eq!(err.to_string(), "photos not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remote_display_keeps_status() {
        let err: CloudFsError = RemoteStatus::new(403, "quota exceeded").into();
        assert_eq!(
            err.to_string(),
            "remote store failure: status 403: quota exceeded"
        );
        assert_eq!(err.remote_status(), Some(&RemoteStatus::new(403, "quota exceeded")));
    }

    #[test]
    fn test_transport_is_not_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err = CloudFsError::Transport(io_err);
        assert!(matches!(err, CloudFsError::Transport(_)));
        assert!(err.to_string().contains("sink closed"));
        assert!(err.remote_status().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let err: CloudFsError = io_err.into();
        assert!(matches!(err, CloudFsError::Io(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_invalid_path_display() {
        let err = CloudFsError::InvalidPath("/".to_string());
        assert_eq!(err.to_string(), "invalid path: /");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_config_error_display() {
        let err = CloudFsError::Config("app_name is empty".to_string());
        assert_eq!(err.to_string(), "configuration error: app_name is empty");
    }
}

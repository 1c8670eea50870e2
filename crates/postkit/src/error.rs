//! POST helper error types

use thiserror::Error;

/// Result type for POST helper operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// POST helper errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// A precondition on the call arguments was violated; raised before any network I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport failure (connect, write, read, proxy), passed through unmodified
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Local I/O failure, e.g. opening a file body
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),

    /// The shared client was already installed
    #[error("Shared HTTP client is already initialized")]
    AlreadyInitialized,
}

impl HttpError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        HttpError::InvalidArgument(message.into())
    }

    /// Check if the error was raised by argument validation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HttpError::InvalidArgument(_))
    }

    /// Check if the transport gave up because a timeout elapsed
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::RequestFailed(e) => e.is_timeout(),
            HttpError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

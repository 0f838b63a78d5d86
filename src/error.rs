//! Error types
//!
//! Every failure of the serving core ends up as one of these variants.
//! All of them except [`ServeError::TransferFailure`] are turned into a
//! status-only response; transfer failures surface after the headers are
//! already committed and are handed back to the host connection layer.

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("method not supported: {0}")]
    MethodNotSupported(String),

    #[error("path traversal rejected: {0}")]
    PathTraversalRejected(String),

    #[error("not readable: {}", .0.display())]
    Unreadable(PathBuf),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transfer failed: {0}")]
    TransferFailure(#[from] io::Error),
}

impl ServeError {
    /// Status code reported to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotSupported(_) => StatusCode::NOT_IMPLEMENTED,
            Self::PathTraversalRejected(_) | Self::Unreadable(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TransferFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServeError::MethodNotSupported("POST".into()).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ServeError::PathTraversalRejected("/a/../b".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServeError::Unreadable(PathBuf::from("/secret")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServeError::NotFound("/missing".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_io_error_becomes_transfer_failure() {
        let err: ServeError = io::Error::new(io::ErrorKind::BrokenPipe, "client gone").into();
        assert!(matches!(err, ServeError::TransferFailure(_)));
        assert_eq!(err.to_string(), "transfer failed: client gone");
    }
}

//! Mailer-level error type.

use thiserror::Error;

/// Errors returned by an [`crate::EmailSender`] implementation.
#[derive(Debug, Error, Clone)]
pub enum SendError {
    /// The send function answered with a non-success status.
    #[error("send function rejected the email: {0}")]
    Rejected(String),

    /// The send function was unreachable or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),
}

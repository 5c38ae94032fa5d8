//! Mail error types.

use std::time::Duration;

use thiserror::Error;

/// Low-level failure reported by a [`crate::MailTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// A from/to address could not be parsed as a mailbox.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message could not be assembled.
    #[error("message build error: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connection, TLS, or authentication failure from the SMTP client.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The server (or a test double) rejected the message.
    #[error("message refused: {0}")]
    Refused(String),

    /// The send did not finish within the configured bound.
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}

/// A failed send, tagged with the recipient it was meant for.
///
/// Carries no credentials: the SMTP route is never part of the error.
#[derive(Debug, Error)]
#[error("failed to send email to '{recipient}'")]
pub struct MailError {
    pub recipient: String,
    #[source]
    pub cause: TransportError,
}

impl MailError {
    pub fn new(recipient: impl Into<String>, cause: TransportError) -> Self {
        Self {
            recipient: recipient.into(),
            cause,
        }
    }
}

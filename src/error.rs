//! Error types for checkpoint resolution.

use thiserror::Error;

/// Errors that can occur while resolving a checkpoint or tracking an event.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request has no checkpoint name.
    #[error("checkpoint name is required")]
    MissingCheckpointName,

    /// The event carries no client IP.
    #[error("event IP is required")]
    MissingEventIp,

    /// Neither a session ID nor a source token was supplied.
    #[error("a session ID or source token is required")]
    MissingIdentity,

    /// The HTTP exchange itself failed (connect, TLS, or I/O error).
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The service replied with a body that could not be decoded.
    #[error("failed to decode {context} response: {message}")]
    Decode {
        /// Which call produced the body (`checkpoint` or `verification`).
        context: &'static str,
        /// Error message.
        message: String,
    },

    /// The service never acknowledged the submission within the retry budget.
    #[error("checkpoint submission failed after {attempts} attempts")]
    SubmissionExhausted {
        /// Number of submission attempts made.
        attempts: u32,
    },
}

impl ClientError {
    /// Check if this error was raised by the validation gate, before any
    /// network activity.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCheckpointName | Self::MissingEventIp | Self::MissingIdentity
        )
    }
}

// src/utils/error.rs
use thiserror::Error;

use crate::core::identity::session::VerificationStep;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered `success: false`; the message is shown to the user as-is.
    #[error("{0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Document image is missing. Please restart the verification from step 1.")]
    MissingDocument,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Operation not allowed at step {0}")]
    InvalidTransition(VerificationStep),

    #[error("A verification request is already in progress")]
    Busy,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a failure originated, for the purposes of recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, non-2xx, malformed body.
    Transport,
    /// Backend processed the request and refused it.
    Application,
    /// Session state did not allow the call; no request was made.
    Precondition,
    /// Rejected locally before reaching the network.
    Local,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) | ClientError::Decode(_) => ErrorKind::Transport,
            ClientError::Api(_) => ErrorKind::Application,
            ClientError::MissingDocument
            | ClientError::InvalidTransition(_)
            | ClientError::Busy => ErrorKind::Precondition,
            ClientError::Config(_)
            | ClientError::InvalidImage(_)
            | ClientError::InvalidRequest(_)
            | ClientError::Io(_) => ErrorKind::Local,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode(error.to_string())
        } else {
            ClientError::Transport(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

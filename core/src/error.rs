//! Error types for the pet record sync layer.
//!
//! # Design
//! Four failure families reach the user: a draft that fails local validation
//! (never sent), a backend that answered with a non-2xx status, a backend that
//! never answered, and a request that could not be built or sent. The
//! `Display` text of each variant is the message shown to the user, so hosts
//! can render `err.to_string()` directly.

use thiserror::Error;

/// A draft rejected before any network call.
///
/// Rules are checked in a fixed order and the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields (Name, Type, Age)")]
    MissingName,

    #[error("Please fill in all required fields (Name, Type, Age)")]
    MissingType,

    #[error("Please select a valid pet type")]
    UnknownType(String),

    #[error("Please fill in all required fields (Name, Type, Age)")]
    MissingAge,

    /// Negative, above 50, fractional and non-numeric ages all share this.
    #[error("Please enter a valid age (0-50)")]
    InvalidAge,
}

/// Failure reported by the host while executing an `HttpRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request went out but nothing came back (backend down, DNS, reset).
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be constructed or sent on the client side.
    #[error("request could not be sent: {0}")]
    Request(String),
}

/// Errors returned by `PetClient` parse methods and the controllers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. The record is not saved.
    #[error("Server error: {detail}")]
    Server { status: u16, detail: String },

    /// No response was received.
    #[error("No response from server. Please check if the backend is running.")]
    Network(String),

    /// The request was malformed on the client side.
    #[error("Error: {0}")]
    Request(String),

    /// A 2xx response whose body is not the expected JSON.
    #[error("Server error: unexpected response ({0})")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NoResponse(msg) => ApiError::Network(msg),
            TransportError::Request(msg) => ApiError::Request(msg),
        }
    }
}

/// Why a form submit did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Submit was called while a previous submit is in flight or after save.
    #[error("form is not accepting edits")]
    NotEditing,
}

/// Errors raised while loading `SyncConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
}

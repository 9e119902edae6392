//! Data service error types

use thiserror::Error;

/// Errors from queries and procedure calls against the data service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never got a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with an error status
    #[error("{}", api_message(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },

    /// A single row was expected and none came back
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

fn api_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Data service returned HTTP {}", status),
    }
}

impl BackendError {
    /// Message supplied by the service itself, if any
    pub fn service_message(&self) -> Option<&str> {
        match self {
            BackendError::Api {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Service message, or `fallback` when the service gave none
    pub fn message_or(&self, fallback: &str) -> String {
        self.service_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Result type for data service operations
pub type BackendResult<T> = Result<T, BackendError>;

//! Remote Data State
//!
//! The loading / failed / ready triple every data consumer works with.

use std::fmt;

/// State of a value that comes from somewhere else (a fetch, a query, an RPC).
///
/// Exactly one variant holds at a time. An empty container in `Ready`
/// is a real answer and is distinct from `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// Request issued, no terminal state yet
    Loading,
    /// Request terminated with a human-readable message
    Failed { message: String },
    /// Request terminated with a value
    Ready(T),
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Remote::Loading
    }
}

impl<T> Remote<T> {
    /// Build a failed state from anything displayable
    pub fn failed(message: impl Into<String>) -> Self {
        Remote::Failed {
            message: message.into(),
        }
    }

    /// Convert a finished request into a terminal state
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Remote::Ready(value),
            Err(e) => Remote::failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Remote::Ready(_))
    }

    /// Error message, if the request failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Value, if the request succeeded
    pub fn data(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the ready value, keeping loading/failed as they are
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Remote<U> {
        match self {
            Remote::Loading => Remote::Loading,
            Remote::Failed { message } => Remote::Failed { message },
            Remote::Ready(value) => Remote::Ready(f(value)),
        }
    }
}

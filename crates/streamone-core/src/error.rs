use thiserror::Error;

use crate::api::RequestError;
use crate::session::SessionError;

/// Errors surfaced by the request layer and the typed cache helpers.
///
/// Session and request failures keep their own types so callers can match on
/// them after a `?` crossed layers.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Cache value error: {0}")]
    Cache(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// The session error behind this error, if any.
    pub fn as_session_error(&self) -> Option<&SessionError> {
        match self {
            Error::Session(err) => Some(err),
            _ => None,
        }
    }

    /// The request error behind this error, if any.
    pub fn as_request_error(&self) -> Option<&RequestError> {
        match self {
            Error::Request(err) => Some(err),
            _ => None,
        }
    }
}

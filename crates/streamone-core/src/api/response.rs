use chrono::Duration;
use serde::{de::DeserializeOwned, Deserialize};

use super::RequestError;
use crate::result::ResultOrError;

/// Status code of a successful call
pub const STATUS_OK: i64 = 0;

/// Header of every API response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseHeader {
    pub status: i64,
    #[serde(rename = "statusmessage", default)]
    pub status_message: String,
    /// Seconds the session stays valid after this call, for session requests
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl ResponseHeader {
    pub fn success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The session timeout announced by the server, if any
    pub fn session_timeout(&self) -> Option<Duration> {
        self.timeout.and_then(duration_from_secs)
    }
}

/// Convert a non-negative number of seconds from the wire into a duration.
pub(crate) fn duration_from_secs(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::milliseconds((secs * 1000.0).round() as i64))
}

/// A decoded API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub header: ResponseHeader,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl Response {
    pub fn success(&self) -> bool {
        self.header.success()
    }

    /// Decode the body as `T`.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        T::deserialize(&self.body).map_err(|_| RequestError::CanNotConvertBody)
    }

    /// Check the header, then decode the body as `T`.
    pub fn into_result<T: DeserializeOwned>(self) -> ResultOrError<T> {
        if !self.success() {
            return ResultOrError::Error(RequestError::from_header(&self.header).into());
        }
        match self.body_as() {
            Ok(value) => ResultOrError::Result(value),
            Err(err) => ResultOrError::Error(err.into()),
        }
    }
}

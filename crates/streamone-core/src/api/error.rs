use thiserror::Error;

use super::ResponseHeader;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors reported by the request layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The call completed but the API reported a failure.
    #[error("API call failed with status {status}: {message}")]
    NoSuccess { status: i64, message: String },

    /// The response body can not be converted to the requested type.
    #[error("Response body can not be converted to the requested type")]
    CanNotConvertBody,

    /// User authentication was used for a session request; sessions belong to applications.
    #[error("User authentication is not supported for session requests")]
    UserAuthenticationNotSupported,
}

impl RequestError {
    /// Build the error for a response whose header reports a failure.
    pub fn from_header(header: &ResponseHeader) -> Self {
        RequestError::NoSuccess {
            status: header.status,
            message: header.status_message.clone(),
        }
    }

    /// Build the error for a non-2xx HTTP response.
    pub fn from_http_status(status: reqwest::StatusCode, body: &str) -> Self {
        RequestError::NoSuccess {
            status: i64::from(status.as_u16()),
            message: truncate_body(body),
        }
    }
}

/// Truncate a response body to avoid carrying excessive data in errors
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

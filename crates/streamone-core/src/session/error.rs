use thiserror::Error;

/// Errors related to sessions.
///
/// Both are precondition failures the caller is expected to handle: log in
/// again on `NoSession`, treat `NoSuchKey` as a cache miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No active session")]
    NoSession,

    #[error("No cached value for key: {0}")]
    NoSuchKey(String),
}

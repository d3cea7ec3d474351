use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CacheValue, SessionError};

/// The credentials and cache of an established session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ActiveSession {
    pub id: String,
    pub key: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub cache: HashMap<String, CacheValue>,
}

impl ActiveSession {
    /// Move the deadline to `now + timeout`.
    pub fn extend(&mut self, timeout: Duration, now: DateTime<Utc>) {
        self.expires_at = deadline(now, timeout);
    }

    /// Time left before the deadline, as seen at `now`.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }

    pub fn get(&self, key: &str) -> Result<CacheValue, SessionError> {
        self.cache
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::NoSuchKey(key.to_string()))
    }

    pub fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.cache
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| SessionError::NoSuchKey(key.to_string()))
    }
}

/// Session state of a store: either nothing, or a complete session.
///
/// Keeping the fields together in one variant makes a half-set session
/// unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub(crate) enum SessionState {
    #[default]
    None,
    Active(ActiveSession),
}

impl SessionState {
    /// A fresh session with an empty cache.
    pub fn establish(
        id: &str,
        key: &str,
        user_id: &str,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        SessionState::Active(ActiveSession {
            id: id.to_string(),
            key: key.to_string(),
            user_id: user_id.to_string(),
            expires_at: deadline(now, timeout),
            cache: HashMap::new(),
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    pub fn clear(&mut self) {
        *self = SessionState::None;
    }

    /// Drop the session if its deadline is at or before `now`.
    ///
    /// Returns true when this call cleared an expired session.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        let expired = match self {
            SessionState::Active(session) => now >= session.expires_at,
            SessionState::None => false,
        };
        if expired {
            debug!("Session expired, clearing session and cache");
            self.clear();
        }
        expired
    }

    /// The live session at `now`, or `NoSession`.
    ///
    /// This is the single liveness check every store operation goes through.
    pub fn live(&mut self, now: DateTime<Utc>) -> Result<&mut ActiveSession, SessionError> {
        self.expire(now);
        match self {
            SessionState::Active(session) => Ok(session),
            SessionState::None => Err(SessionError::NoSession),
        }
    }
}

/// `now + timeout`, saturating at the representable bounds.
fn deadline(now: DateTime<Utc>, timeout: Duration) -> DateTime<Utc> {
    now.checked_add_signed(timeout).unwrap_or(if timeout < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};

use super::SessionError;
use crate::error::Result;

/// Value stored in a session cache.
///
/// Any serializable data fits: null, booleans, numbers, strings, lists and maps.
pub type CacheValue = serde_json::Value;

/// Storage for the active session and its cache.
///
/// As a part of storing session information, a store caches data for the
/// duration of the session. Data cached in a session is kept for exactly the
/// lifetime of the session: clearing, replacing or expiring the session drops
/// the cache with it.
///
/// Liveness is evaluated lazily. Every operation that needs a session first
/// checks the deadline and, if it has passed, clears the session before
/// reporting [`SessionError::NoSession`]. Implementations must perform that
/// check and the operation it guards as one critical section.
pub trait SessionStore: Send + Sync {
    /// Whether there is an active session.
    fn has_session(&self) -> bool;

    /// Clears the current session and its cache.
    fn clear_session(&self);

    /// Save a session to this store, replacing any previous session and its cache.
    ///
    /// `timeout` is the time from now after which the session becomes invalid
    /// when no requests extend it.
    fn set_session(&self, id: &str, key: &str, user_id: &str, timeout: Duration);

    /// Move the deadline of the active session to `timeout` from now.
    fn set_timeout(&self, timeout: Duration) -> Result<(), SessionError>;

    /// The current session ID.
    fn id(&self) -> Result<String, SessionError>;

    /// The current session key.
    fn key(&self) -> Result<String, SessionError>;

    /// The ID of the user logged in with the current session.
    fn user_id(&self) -> Result<String, SessionError>;

    /// Time left before the current session expires.
    fn timeout(&self) -> Result<Duration, SessionError>;

    /// Whether `key` is set in the session cache.
    fn has_cache_key(&self, key: &str) -> Result<bool, SessionError>;

    /// The cached value for `key`.
    fn get_cache_key(&self, key: &str) -> Result<CacheValue, SessionError>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set_cache_key(&self, key: &str, value: CacheValue) -> Result<(), SessionError>;

    /// Remove the cached value for `key`.
    fn unset_cache_key(&self, key: &str) -> Result<(), SessionError>;
}

/// Typed access to the session cache.
pub trait SessionStoreExt: SessionStore {
    /// Read a cached value and decode it as `T`.
    fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get_cache_key(key)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Encode `value` and store it under `key`.
    fn set_cached<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_cache_key(key, value)?;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

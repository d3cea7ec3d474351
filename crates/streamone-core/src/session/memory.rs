use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use tracing::debug;

use super::state::SessionState;
use super::{CacheValue, SessionError, SessionStore};

/// In-memory session storage.
///
/// The session is only known for the lifetime of the instance and is
/// discarded once the instance is dropped.
#[derive(Default)]
pub struct MemorySessionStore {
    state: Mutex<SessionState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is consistent between statements, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn has_session(&self) -> bool {
        self.lock().live(Utc::now()).is_ok()
    }

    fn clear_session(&self) {
        self.lock().clear();
    }

    fn set_session(&self, id: &str, key: &str, user_id: &str, timeout: Duration) {
        let mut state = self.lock();
        if state.is_active() {
            debug!("Replacing existing session");
        }
        *state = SessionState::establish(id, key, user_id, timeout, Utc::now());
        debug!(user_id = %user_id, "Session established");
    }

    fn set_timeout(&self, timeout: Duration) -> Result<(), SessionError> {
        let now = Utc::now();
        self.lock().live(now)?.extend(timeout, now);
        Ok(())
    }

    fn id(&self) -> Result<String, SessionError> {
        Ok(self.lock().live(Utc::now())?.id.clone())
    }

    fn key(&self) -> Result<String, SessionError> {
        Ok(self.lock().live(Utc::now())?.key.clone())
    }

    fn user_id(&self) -> Result<String, SessionError> {
        Ok(self.lock().live(Utc::now())?.user_id.clone())
    }

    fn timeout(&self) -> Result<Duration, SessionError> {
        let now = Utc::now();
        Ok(self.lock().live(now)?.remaining(now))
    }

    fn has_cache_key(&self, key: &str) -> Result<bool, SessionError> {
        Ok(self.lock().live(Utc::now())?.cache.contains_key(key))
    }

    fn get_cache_key(&self, key: &str) -> Result<CacheValue, SessionError> {
        self.lock().live(Utc::now())?.get(key)
    }

    fn set_cache_key(&self, key: &str, value: CacheValue) -> Result<(), SessionError> {
        self.lock()
            .live(Utc::now())?
            .cache
            .insert(key.to_string(), value);
        Ok(())
    }

    fn unset_cache_key(&self, key: &str) -> Result<(), SessionError> {
        self.lock().live(Utc::now())?.remove(key)
    }
}

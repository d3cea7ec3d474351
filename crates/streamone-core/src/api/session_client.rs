//! Requests executed inside an authenticated session.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::SessionCredentials;
use super::response::duration_from_secs;
use super::{ApiClient, Arguments, RequestError, Response};
use crate::error::{Error, Result};
use crate::session::{SessionStore, SessionStoreExt};

/// HTTP status the server answers with when it no longer knows the session
const SESSION_REJECTED_STATUS: i64 = 401;

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
    key: String,
    user: String,
    timeout: f64,
}

/// Runs API commands inside a session kept in a [`SessionStore`].
///
/// Sessions are created and used by an application on behalf of a user, so
/// the underlying client must use application authentication.
pub struct SessionClient<S: ?Sized> {
    api: ApiClient,
    store: Arc<S>,
}

impl<S: SessionStore + ?Sized> SessionClient<S> {
    pub fn new(api: ApiClient, store: Arc<S>) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the store holds a live session
    pub fn has_session(&self) -> bool {
        self.store.has_session()
    }

    /// Log in as `username`, replacing any previous session and its cache.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.require_application_auth()?;

        let args = Arguments::new()
            .with("user", username)
            .with("password", password);
        let response = self.api.send("session", "create", &args).await?;
        let created: SessionCreated = response.into_result().into_result()?;

        let timeout =
            duration_from_secs(created.timeout).ok_or(RequestError::CanNotConvertBody)?;
        self.store
            .set_session(&created.id, &created.key, &created.user, timeout);

        info!(user_id = %created.user, "Logged in");
        Ok(())
    }

    /// Send a command authenticated with the active session.
    ///
    /// A successful call slides the session deadline to the timeout the
    /// server reports.
    pub async fn send(&self, command: &str, action: &str, args: &Arguments) -> Result<Response> {
        self.require_application_auth()?;

        let id = self.store.id()?;
        let key = self.store.key()?;
        let credentials = SessionCredentials {
            id: &id,
            key: &key,
        };

        let response = match self.api.execute(command, action, args, Some(credentials)).await {
            Ok(response) => response,
            Err(Error::Request(RequestError::NoSuccess { status, message }))
                if status == SESSION_REJECTED_STATUS =>
            {
                warn!("Server rejected session, clearing it");
                self.store.clear_session();
                return Err(RequestError::NoSuccess { status, message }.into());
            }
            Err(e) => return Err(e),
        };

        if response.success() {
            if let Some(timeout) = response.header.session_timeout() {
                if let Err(e) = self.store.set_timeout(timeout) {
                    debug!(error = %e, "Session ended before its timeout could be extended");
                }
            }
        }
        Ok(response)
    }

    /// End the session on the server and clear it locally.
    pub async fn logout(&self) -> Result<()> {
        if self.store.has_session() {
            if let Err(e) = self.send("session", "delete", &Arguments::new()).await {
                warn!(error = %e, "Failed to delete session on server");
            }
        }
        self.store.clear_session();
        info!("Logged out");
        Ok(())
    }

    /// Return the value cached under `key`, or compute it with `fetch` and cache it.
    ///
    /// The value lives exactly as long as the current session.
    pub async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.store.has_cache_key(key)? {
            debug!(key = %key, "Session cache hit");
            return self.store.get_cached(key);
        }

        let value = fetch().await?;
        self.store.set_cached(key, &value)?;
        Ok(value)
    }

    fn require_application_auth(&self) -> Result<()> {
        if self.api.authentication().is_user_auth() {
            return Err(RequestError::UserAuthenticationNotSupported.into());
        }
        Ok(())
    }
}

//! StreamOne SDK core library.
//!
//! The centre of this crate is the [`SessionStore`]: it holds the credentials
//! of the active session, expires them on a sliding deadline, and owns a cache
//! whose lifetime is exactly that of the session. Around it sit a thin request
//! layer ([`api`]) and the on-disk [`Config`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod result;
pub mod session;

pub use api::{ApiClient, Argument, Arguments, RequestError, Response, ResponseHeader, SessionClient};
pub use auth::AuthenticationType;
pub use config::{Config, SessionStoreKind};
pub use error::{Error, Result};
pub use result::ResultOrError;
pub use session::{
    CacheValue, FileSessionStore, MemorySessionStore, SessionError, SessionStore, SessionStoreExt,
};

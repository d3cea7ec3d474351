//! Session storage for authenticated API access.
//!
//! This module provides:
//! - `SessionStore`: the contract every backing store implements
//! - `MemorySessionStore`: volatile, process-local storage
//! - `FileSessionStore`: storage mirrored to a JSON file so sessions survive restarts
//!
//! A session expires on a sliding deadline that is checked lazily on every
//! access. The moment a check finds the deadline passed, the session and its
//! cache are wiped. Cached data never outlives the session that stored it.

#[cfg(test)]
#[macro_use]
mod contract;

mod error;
mod file;
mod memory;
mod state;
mod store;

pub use error::SessionError;
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use store::{CacheValue, SessionStore, SessionStoreExt};

//! Authentication identities for outgoing requests.
//!
//! An [`AuthenticationType`] says who is talking to the API: a user or an
//! application, each identified by an id and a pre-shared key.

pub mod authentication;

pub use authentication::AuthenticationType;

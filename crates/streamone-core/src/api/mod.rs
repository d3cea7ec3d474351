//! REST API client module for StreamOne services.
//!
//! This module provides the `ApiClient` for sending commands to the API and
//! the `SessionClient` that runs them inside a session held by a
//! [`SessionStore`](crate::session::SessionStore).
//!
//! Every response arrives in an envelope with a status header; a status of 0
//! means success.

pub mod argument;
pub mod client;
pub mod error;
pub mod response;
pub mod session_client;

pub use argument::{Argument, Arguments};
pub use client::ApiClient;
pub use error::RequestError;
pub use response::{Response, ResponseHeader};
pub use session_client::SessionClient;

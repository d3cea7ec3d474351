use std::fmt;

use serde::{Deserialize, Serialize};

/// How to authenticate against the StreamOne API.
///
/// Equality is structural and variant-aware: a `User` and an `Application`
/// with the same id and key are different identities.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthenticationType {
    /// Authenticate as a user
    User { id: String, psk: String },

    /// Authenticate as an application
    Application { id: String, psk: String },
}

impl AuthenticationType {
    pub fn user(id: impl Into<String>, psk: impl Into<String>) -> Self {
        AuthenticationType::User {
            id: id.into(),
            psk: psk.into(),
        }
    }

    pub fn application(id: impl Into<String>, psk: impl Into<String>) -> Self {
        AuthenticationType::Application {
            id: id.into(),
            psk: psk.into(),
        }
    }

    /// The actor ID
    pub fn id(&self) -> &str {
        match self {
            AuthenticationType::User { id, .. } | AuthenticationType::Application { id, .. } => id,
        }
    }

    /// The pre-shared key of the actor
    pub fn psk(&self) -> &str {
        match self {
            AuthenticationType::User { psk, .. } | AuthenticationType::Application { psk, .. } => {
                psk
            }
        }
    }

    pub fn is_user_auth(&self) -> bool {
        matches!(self, AuthenticationType::User { .. })
    }

    /// Name used for the actor kind on the wire and in logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthenticationType::User { .. } => "user",
            AuthenticationType::Application { .. } => "application",
        }
    }
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationType::User { id, .. } => write!(f, "User({})", id),
            AuthenticationType::Application { id, .. } => write!(f, "Application({})", id),
        }
    }
}

// The pre-shared key stays out of debug output.
impl fmt::Debug for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthenticationType::User { .. } => "User",
            AuthenticationType::Application { .. } => "Application",
        };
        f.debug_struct(name)
            .field("id", &self.id())
            .field("psk", &"<redacted>")
            .finish()
    }
}

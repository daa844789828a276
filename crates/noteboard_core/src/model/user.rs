//! Caller identity as resolved by the external session collaborator.
//!
//! Core never authenticates credentials; it only compares identity equality.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier issued by the identity collaborator.
pub type UserId = Uuid;

/// Authenticated user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable id used for ownership comparisons.
    pub id: UserId,
    /// Display name. Never used for authorization.
    pub username: String,
}

impl Identity {
    /// Creates an identity with a freshly generated id.
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), username)
    }

    /// Creates an identity with an id that already exists upstream.
    pub fn with_id(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Who is issuing the current operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Identity),
}

impl Caller {
    /// Returns the resolved identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns the caller's user id, if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        self.identity().map(|identity| identity.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Identity> for Caller {
    fn from(value: Identity) -> Self {
        Self::Authenticated(value)
    }
}

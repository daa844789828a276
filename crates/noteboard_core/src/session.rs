//! Identity/session resolution seam.
//!
//! Credential checks live with the external auth collaborator; core only
//! turns an opaque session token into a `Caller`.

use crate::model::user::{Caller, Identity};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Resolves the caller for one inbound request.
pub trait SessionResolver {
    /// Unknown, missing or revoked tokens resolve to `Caller::Anonymous`.
    fn resolve(&self, token: Option<&str>) -> Caller;
}

/// Session table held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySessions {
    sessions: BTreeMap<String, Identity>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for an already authenticated identity.
    pub fn login(&mut self, identity: Identity) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), identity);
        token
    }

    /// Revokes a session. Returns whether it existed.
    pub fn logout(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }
}

impl SessionResolver for InMemorySessions {
    fn resolve(&self, token: Option<&str>) -> Caller {
        token
            .and_then(|value| self.sessions.get(value.trim()))
            .cloned()
            .map_or(Caller::Anonymous, Caller::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemorySessions, SessionResolver};
    use crate::model::user::{Caller, Identity};

    #[test]
    fn resolves_logged_in_identity() {
        let mut sessions = InMemorySessions::new();
        let identity = Identity::new("author");
        let token = sessions.login(identity.clone());
        assert_eq!(
            sessions.resolve(Some(token.as_str())),
            Caller::Authenticated(identity)
        );
    }

    #[test]
    fn missing_unknown_and_revoked_tokens_are_anonymous() {
        let mut sessions = InMemorySessions::new();
        let token = sessions.login(Identity::new("author"));
        assert_eq!(sessions.resolve(None), Caller::Anonymous);
        assert_eq!(sessions.resolve(Some("nope")), Caller::Anonymous);
        assert!(sessions.logout(&token));
        assert_eq!(sessions.resolve(Some(token.as_str())), Caller::Anonymous);
        assert!(!sessions.logout(&token));
    }
}

//! Ownership-based access control guard.
//!
//! # Responsibility
//! - Decide allow / redirect-to-login / deny-as-not-found for one operation
//!   from plain data: caller, resource owner and action.
//!
//! # Invariants
//! - A non-owner never learns that an owned resource exists: mutations and
//!   owner-only reads answer `DenyAsNotFound`, whatever the non-owner's role.
//! - Anonymous callers are redirected with the exact requested path.
//! - The guard has no side effects; callers short-circuit on anything other
//!   than `Decision::Allow`.

use crate::model::comment::Comment;
use crate::model::note::Note;
use crate::model::user::{Caller, UserId};
use crate::routes::RouteConfig;

/// Operation class being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// View one resource. Public when the resource has no owner.
    Read,
    /// List the caller's own resources; filtering, never denial.
    ListOwn,
    /// Create a resource owned by the caller.
    Create,
    /// Edit or delete an existing resource.
    Mutate,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ListOwn => "list_own",
            Self::Create => "create",
            Self::Mutate => "mutate",
        }
    }
}

/// Guard verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Caller must authenticate, then come back to `next`.
    RedirectToLogin { next: String },
    /// Respond exactly as if the resource did not exist.
    DenyAsNotFound,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::RedirectToLogin { .. } => "redirect_to_login",
            Self::DenyAsNotFound => "deny_as_not_found",
        }
    }
}

/// Records with a single owning identity.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

impl Owned for Note {
    fn owner_id(&self) -> UserId {
        self.owner
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> UserId {
        self.author
    }
}

/// Authorizes one operation.
///
/// `resource_owner` is `None` for resources without an ownership restriction
/// (news pages) and for collection-level actions (`Create`, `ListOwn`).
pub fn authorize(
    caller: &Caller,
    resource_owner: Option<UserId>,
    action: Action,
    requested_path: &str,
) -> Decision {
    if action == Action::Read && resource_owner.is_none() {
        return Decision::Allow;
    }

    let Some(caller_id) = caller.user_id() else {
        return Decision::RedirectToLogin {
            next: requested_path.to_string(),
        };
    };

    match (action, resource_owner) {
        (Action::ListOwn | Action::Create, _) => Decision::Allow,
        (_, Some(owner)) if owner == caller_id => Decision::Allow,
        (_, Some(_)) => Decision::DenyAsNotFound,
        (_, None) => Decision::Allow,
    }
}

/// Authorizes plain page access: public pages for everyone, anything else
/// for authenticated callers.
pub fn authorize_page(caller: &Caller, routes: &RouteConfig, path: &str) -> Decision {
    if routes.is_public_page(path) || caller.is_authenticated() {
        return Decision::Allow;
    }
    Decision::RedirectToLogin {
        next: path.to_string(),
    }
}

/// Keeps only the records owned by the caller. Anonymous callers own nothing.
pub fn retain_owned<T: Owned>(caller: &Caller, records: Vec<T>) -> Vec<T> {
    match caller.user_id() {
        Some(caller_id) => records
            .into_iter()
            .filter(|record| record.owner_id() == caller_id)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{authorize, authorize_page, retain_owned, Action, Decision};
    use crate::model::note::Note;
    use crate::model::user::{Caller, Identity};
    use crate::routes::RouteConfig;

    fn author() -> Identity {
        Identity::new("author")
    }

    #[test]
    fn public_read_is_allowed_for_anonymous() {
        assert_eq!(
            authorize(&Caller::Anonymous, None, Action::Read, "/"),
            Decision::Allow
        );
    }

    #[test]
    fn anonymous_is_redirected_for_every_guarded_action() {
        let owner = author();
        for (owner_id, action) in [
            (Some(owner.id), Action::Read),
            (Some(owner.id), Action::Mutate),
            (None, Action::Create),
            (None, Action::ListOwn),
        ] {
            assert_eq!(
                authorize(&Caller::Anonymous, owner_id, action, "/edit/note/"),
                Decision::RedirectToLogin {
                    next: "/edit/note/".to_string()
                },
                "action {}",
                action.as_str()
            );
        }
    }

    #[test]
    fn non_owner_is_denied_as_not_found() {
        let owner = author();
        let reader = Caller::from(Identity::new("reader"));
        let admin = Caller::from(Identity::new("admin"));
        for caller in [&reader, &admin] {
            for action in [Action::Read, Action::Mutate] {
                assert_eq!(
                    authorize(caller, Some(owner.id), action, "/delete/note/"),
                    Decision::DenyAsNotFound
                );
            }
        }
    }

    #[test]
    fn owner_is_allowed() {
        let owner = author();
        let caller = Caller::from(owner.clone());
        for action in [Action::Read, Action::Mutate] {
            assert!(authorize(&caller, Some(owner.id), action, "/edit/note/").is_allowed());
        }
    }

    #[test]
    fn collection_actions_only_need_authentication() {
        let caller = Caller::from(author());
        let someone_else = Identity::new("other");
        assert!(authorize(&caller, None, Action::Create, "/add/").is_allowed());
        assert!(authorize(&caller, Some(someone_else.id), Action::ListOwn, "/notes/").is_allowed());
    }

    #[test]
    fn page_guard_lets_public_pages_through() {
        let routes = RouteConfig::default();
        assert!(authorize_page(&Caller::Anonymous, &routes, "/auth/logout/").is_allowed());
        assert_eq!(
            authorize_page(&Caller::Anonymous, &routes, "/done/"),
            Decision::RedirectToLogin {
                next: "/done/".to_string()
            }
        );
        assert!(authorize_page(&Caller::from(author()), &routes, "/done/").is_allowed());
    }

    #[test]
    fn retain_owned_filters_foreign_records() {
        let owner = author();
        let other = Identity::new("other");
        let notes = vec![
            Note::new(owner.id, "a", "A", "text"),
            Note::new(other.id, "b", "B", "text"),
        ];
        let kept = retain_owned(&Caller::from(owner.clone()), notes.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].slug, "a");
        assert!(retain_owned(&Caller::Anonymous, notes).is_empty());
    }
}

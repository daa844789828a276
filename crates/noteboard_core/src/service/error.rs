//! Service error taxonomy.

use crate::moderation::Rejected;
use crate::repo::RepoError;
use crate::routes::STATUS_NOT_FOUND;
use crate::slug::{slug_taken_message, SlugError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a resource is unavailable to the caller.
///
/// Both constructors render and report identically; the distinction exists
/// for logs only and must not cross the outward interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUnavailable {
    NotFound,
    NotOwner,
}

impl ResourceUnavailable {
    pub fn status(self) -> u16 {
        STATUS_NOT_FOUND
    }

    pub(crate) fn reason(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NotOwner => "not_owner",
        }
    }
}

impl Display for ResourceUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource not found")
    }
}

#[derive(Debug)]
pub enum ServiceError {
    /// Caller must log in; `login_url` carries the return path.
    Unauthenticated { login_url: String },
    Unavailable(ResourceUnavailable),
    SlugConflict(String),
    SlugInvalid { value: String, max_length: usize },
    ModerationRejected(Rejected),
    /// Opaque storage fault.
    Storage(RepoError),
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Form field a validation error belongs to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::SlugConflict(_) | Self::SlugInvalid { .. } => Some("slug"),
            Self::ModerationRejected(_) => Some("text"),
            _ => None,
        }
    }

    /// User-facing field message for validation errors.
    pub fn field_message(&self) -> Option<String> {
        match self {
            Self::SlugConflict(slug) => Some(slug_taken_message(slug)),
            Self::SlugInvalid { value, max_length } => Some(
                SlugError::Invalid {
                    value: value.clone(),
                    max_length: *max_length,
                }
                .to_string(),
            ),
            Self::ModerationRejected(rejected) => Some(rejected.warning.clone()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Unavailable(reason) => reason.reason(),
            Self::SlugConflict(_) => "slug_conflict",
            Self::SlugInvalid { .. } => "slug_invalid",
            Self::ModerationRejected(_) => "moderation_rejected",
            Self::Storage(_) => "storage",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated { login_url } => {
                write!(f, "authentication required: {login_url}")
            }
            Self::Unavailable(reason) => write!(f, "{reason}"),
            Self::SlugConflict(_) | Self::SlugInvalid { .. } | Self::ModerationRejected(_) => {
                write!(f, "{}", self.field_message().unwrap_or_default())
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::ModerationRejected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::Unavailable(ResourceUnavailable::NotFound),
            RepoError::SlugTaken(slug) => Self::SlugConflict(slug),
            other => Self::Storage(other),
        }
    }
}

impl From<SlugError> for ServiceError {
    fn from(value: SlugError) -> Self {
        match value {
            SlugError::Conflict(slug) => Self::SlugConflict(slug),
            SlugError::Invalid { value, max_length } => Self::SlugInvalid { value, max_length },
        }
    }
}

impl From<Rejected> for ServiceError {
    fn from(value: Rejected) -> Self {
        Self::ModerationRejected(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceUnavailable, ServiceError};
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn not_owner_and_not_found_look_the_same() {
        let not_owner = ServiceError::Unavailable(ResourceUnavailable::NotOwner);
        let not_found = ServiceError::Unavailable(ResourceUnavailable::NotFound);
        assert_eq!(not_owner.to_string(), not_found.to_string());
        assert_eq!(
            ResourceUnavailable::NotOwner.status(),
            ResourceUnavailable::NotFound.status()
        );
    }

    #[test]
    fn repo_errors_map_to_taxonomy() {
        assert!(ServiceError::from(RepoError::NotFound(Uuid::new_v4())).is_not_found());
        let conflict = ServiceError::from(RepoError::SlugTaken("slug".to_string()));
        assert_eq!(conflict.field(), Some("slug"));
        assert_eq!(
            conflict.field_message().as_deref(),
            Some("slug - already taken, enter another value.")
        );
    }
}

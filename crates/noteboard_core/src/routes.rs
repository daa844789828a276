//! Abstract endpoint surface: paths, login redirects and reply shapes.
//!
//! # Responsibility
//! - Build the paths services report in redirects.
//! - Collapse service outcomes into the outward status contract.
//!
//! # Invariants
//! - Redirect-to-login target is always `<login>?next=<requested path>`.
//! - `NotOwner` and `NotFound` produce the same `Reply::NotFound`.
//! - Storage faults are never turned into a reply; they pass through.

use crate::model::comment::CommentId;
use crate::model::news::NewsId;
use crate::service::ServiceError;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_FOUND: u16 = 302;
pub const STATUS_NOT_FOUND: u16 = 404;

/// Route table used to build redirect targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub login: String,
    pub logout: String,
    pub signup: String,
    pub notes_home: String,
    pub notes_list: String,
    pub note_add: String,
    pub note_success: String,
    pub note_detail_prefix: String,
    pub note_edit_prefix: String,
    pub note_delete_prefix: String,
    pub news_home: String,
    pub news_detail_prefix: String,
    pub comment_edit_prefix: String,
    pub comment_delete_prefix: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login: "/auth/login/".to_string(),
            logout: "/auth/logout/".to_string(),
            signup: "/auth/signup/".to_string(),
            notes_home: "/".to_string(),
            notes_list: "/notes/".to_string(),
            note_add: "/add/".to_string(),
            note_success: "/done/".to_string(),
            note_detail_prefix: "/note/".to_string(),
            note_edit_prefix: "/edit/".to_string(),
            note_delete_prefix: "/delete/".to_string(),
            news_home: "/".to_string(),
            news_detail_prefix: "/news/".to_string(),
            comment_edit_prefix: "/edit_comment/".to_string(),
            comment_delete_prefix: "/delete_comment/".to_string(),
        }
    }
}

impl RouteConfig {
    /// `<login>?next=<next>`.
    pub fn login_redirect(&self, next: &str) -> String {
        format!("{}?next={next}", self.login)
    }

    pub fn note_detail(&self, slug: &str) -> String {
        format!("{}{slug}/", self.note_detail_prefix)
    }

    pub fn note_edit(&self, slug: &str) -> String {
        format!("{}{slug}/", self.note_edit_prefix)
    }

    pub fn note_delete(&self, slug: &str) -> String {
        format!("{}{slug}/", self.note_delete_prefix)
    }

    pub fn news_detail(&self, news_id: NewsId) -> String {
        format!("{}{news_id}/", self.news_detail_prefix)
    }

    /// Comment thread anchor on the news detail page.
    pub fn news_comments(&self, news_id: NewsId) -> String {
        format!("{}#comments", self.news_detail(news_id))
    }

    pub fn comment_edit(&self, comment_id: CommentId) -> String {
        format!("{}{comment_id}/", self.comment_edit_prefix)
    }

    pub fn comment_delete(&self, comment_id: CommentId) -> String {
        format!("{}{comment_id}/", self.comment_delete_prefix)
    }

    /// Pages every caller may open (login, logout, signup, both home pages).
    pub fn is_public_page(&self, path: &str) -> bool {
        [
            self.login.as_str(),
            self.logout.as_str(),
            self.signup.as_str(),
            self.notes_home.as_str(),
            self.news_home.as_str(),
        ]
        .contains(&path)
            || (path.starts_with(self.news_detail_prefix.as_str())
                && path.len() > self.news_detail_prefix.len())
    }
}

/// Outward reply for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// Rendered page (200).
    Page(T),
    /// Redirect to the given location (302).
    Redirect(String),
    /// Resource absent or not owned by the caller (404).
    NotFound,
    /// Form re-rendered with a field error (200).
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl<T> Reply<T> {
    pub fn status(&self) -> u16 {
        match self {
            Self::Page(_) | Self::Invalid { .. } => STATUS_OK,
            Self::Redirect(_) => STATUS_FOUND,
            Self::NotFound => STATUS_NOT_FOUND,
        }
    }

    /// Redirect location, when this is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect(location) => Some(location.as_str()),
            _ => None,
        }
    }

    /// Maps a service outcome onto the reply contract.
    ///
    /// # Errors
    /// - Returns the original error for storage faults and internal
    ///   inconsistencies; those are outside the reply contract.
    pub fn from_service<U>(
        result: Result<U, ServiceError>,
        on_ok: impl FnOnce(U) -> Reply<T>,
    ) -> Result<Self, ServiceError> {
        match result {
            Ok(value) => Ok(on_ok(value)),
            Err(ServiceError::Unauthenticated { login_url }) => Ok(Self::Redirect(login_url)),
            Err(ServiceError::Unavailable(_)) => Ok(Self::NotFound),
            Err(err) => match (err.field(), err.field_message()) {
                (Some(field), Some(message)) => Ok(Self::Invalid { field, message }),
                _ => Err(err),
            },
        }
    }
}

//! Core domain logic for noteboard: owned notes, public news and comments.
//!
//! This crate owns the access decisions, slug allocation, comment moderation
//! and list ordering. Routing, templating, credentials and session cookies
//! belong to callers; they hand in a resolved `Caller` and get back a
//! result that maps onto `routes::Reply`.

pub mod access;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod moderation;
pub mod ordering;
pub mod repo;
pub mod routes;
pub mod service;
pub mod session;
pub mod slug;

pub use access::{authorize, authorize_page, Action, Decision, Owned};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig, LoggingConfig, ModerationConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::comment::{Comment, CommentId};
pub use model::news::{NewsId, NewsItem};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::user::{Caller, Identity, UserId};
pub use moderation::{ContentModerator, Rejected};
pub use ordering::OrderingPolicy;
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::news_repo::{NewsRepository, SqliteNewsRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use routes::{Reply, RouteConfig};
pub use service::comment_service::CommentService;
pub use service::news_service::{NewsDetail, NewsService};
pub use service::note_service::NoteService;
pub use service::{ResourceUnavailable, ServiceError};
pub use session::{InMemorySessions, SessionResolver};
pub use slug::{slugify, SlugAllocator, SlugError, SlugProposal};

/// Minimal health-check API for integration smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

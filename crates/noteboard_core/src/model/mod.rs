//! Domain model for owned notes, public news and their comments.
//!
//! # Responsibility
//! - Define the records shared by access control, slug allocation,
//!   moderation and storage.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Ownership (`Note::owner`, `Comment::author`) never changes after creation.
//! - Timestamps are epoch milliseconds assigned by a `Clock`, never inferred
//!   from storage insertion order.

pub mod comment;
pub mod news;
pub mod note;
pub mod user;

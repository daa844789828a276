//! Comment attached to a news item.
//!
//! # Invariants
//! - `news_id` and `author` are fixed at creation.
//! - `created_at` orders the thread; it is not guaranteed unique.

use crate::model::news::NewsId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CommentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub news_id: NewsId,
    pub author: UserId,
    pub text: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl Comment {
    pub fn new(news_id: NewsId, author: UserId, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            news_id,
            author,
            text: text.into(),
            created_at,
        }
    }
}

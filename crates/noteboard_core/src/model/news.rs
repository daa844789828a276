//! Publicly visible news item.
//!
//! News items are created by an ingestion path outside this crate and are
//! immutable afterwards; core only reads them.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NewsId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub text: String,
    /// Publication time in epoch milliseconds.
    pub published_at: i64,
}

impl NewsItem {
    /// Creates a news item with an explicit publication time.
    pub fn new(title: impl Into<String>, text: impl Into<String>, published_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            published_at,
        }
    }

    /// Creates a news item published "now" according to `clock`.
    pub fn published_now(
        title: impl Into<String>,
        text: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(title, text, clock.now_ms())
    }
}

//! Privately owned note.
//!
//! # Invariants
//! - `slug` is unique across all notes; storage enforces it atomically.
//! - `owner` is fixed at creation; edits replace title/text/slug only.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NoteId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner: UserId,
    pub slug: String,
    pub title: String,
    pub text: String,
}

impl Note {
    /// Creates a note with a generated id.
    pub fn new(
        owner: UserId,
        slug: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            slug: slug.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Submitted note form payload.
///
/// An empty `slug` asks the allocator to derive one from `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }
}

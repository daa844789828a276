//! Comment text moderation.
//!
//! # Invariants
//! - Matching is a case-sensitive substring search; word boundaries are
//!   ignored.
//! - Results depend only on the configured terms and the input text.

use crate::config::ModerationConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Text was rejected; `warning` is the configured field message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub warning: String,
}

impl Display for Rejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.warning)
    }
}

impl Error for Rejected {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentModerator {
    forbidden_terms: Vec<String>,
    warning: String,
}

impl ContentModerator {
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            forbidden_terms: config.forbidden_terms.clone(),
            warning: config.warning.clone(),
        }
    }

    /// Rejects `text` when it contains any forbidden term.
    pub fn moderate(&self, text: &str) -> Result<(), Rejected> {
        match self.first_match(text) {
            Some(_) => Err(Rejected {
                warning: self.warning.clone(),
            }),
            None => Ok(()),
        }
    }

    /// First forbidden term (in configured order) found in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.forbidden_terms
            .iter()
            .map(String::as_str)
            .find(|term| !term.is_empty() && text.contains(term))
    }
}

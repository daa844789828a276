//! Note slug derivation and validation.
//!
//! # Responsibility
//! - Validate explicit slug candidates.
//! - Derive URL-safe ASCII slugs from titles when no candidate is given.
//!
//! # Invariants
//! - Output slugs match `^[-a-zA-Z0-9_]+$` and never exceed the configured
//!   maximum length.
//! - Derivation is deterministic: the same title always yields the same slug.
//! - Uniqueness is not decided here; storage checks and inserts in one
//!   transaction (see `NoteRepository::insert_note`).

use crate::config::CoreConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suffix appended to a taken slug in the field error.
pub const SLUG_TAKEN_SUFFIX: &str = " - already taken, enter another value.";

const SEPARATOR: char = '-';

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));
static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));

/// Slug field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// Another note already uses this slug.
    Conflict(String),
    /// Candidate (or derived value) is not a usable slug.
    Invalid { value: String, max_length: usize },
}

impl Display for SlugError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(slug) => write!(f, "{}", slug_taken_message(slug)),
            Self::Invalid { value, max_length } => write!(
                f,
                "`{value}` is not a valid slug: use up to {max_length} latin letters, digits, underscores or hyphens."
            ),
        }
    }
}

impl Error for SlugError {}

/// `"<slug> - already taken, enter another value."`
pub fn slug_taken_message(slug: &str) -> String {
    format!("{slug}{SLUG_TAKEN_SUFFIX}")
}

/// Chosen slug plus whether it was derived from the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugProposal {
    pub slug: String,
    pub derived: bool,
}

/// Picks the slug a note should be stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugAllocator {
    max_length: usize,
}

impl SlugAllocator {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.slug_max_length)
    }

    /// Validates `candidate`, or derives a slug from `title` when the
    /// candidate is blank.
    ///
    /// # Errors
    /// - `SlugError::Invalid` when the candidate has characters outside
    ///   `[-a-zA-Z0-9_]`, is too long, or the title transliterates to nothing.
    pub fn propose(&self, candidate: &str, title: &str) -> Result<SlugProposal, SlugError> {
        let candidate = candidate.trim();
        if !candidate.is_empty() {
            if candidate.len() > self.max_length || !SLUG_RE.is_match(candidate) {
                return Err(SlugError::Invalid {
                    value: candidate.to_string(),
                    max_length: self.max_length,
                });
            }
            return Ok(SlugProposal {
                slug: candidate.to_string(),
                derived: false,
            });
        }

        let derived = slugify(title, self.max_length);
        if derived.is_empty() {
            return Err(SlugError::Invalid {
                value: derived,
                max_length: self.max_length,
            });
        }
        Ok(SlugProposal {
            slug: derived,
            derived: true,
        })
    }
}

/// Transliterates `title` into a lower-case, hyphen-separated ASCII slug.
///
/// Cyrillic letters map to Latin sequences, `&` becomes `and`, and every run
/// of whitespace or punctuation collapses into one `-`. Leading and trailing
/// separators are stripped and the result is cut to `max_length`.
pub fn slugify(title: &str, max_length: usize) -> String {
    let lowered = title.to_lowercase();
    let expanded = AMPERSAND_RE.replace_all(&lowered, " and ");

    let mut latin = String::with_capacity(expanded.len());
    for ch in expanded.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            latin.push(ch);
        } else if let Some(mapped) = transliterate(ch) {
            latin.push_str(mapped);
        } else {
            latin.push(SEPARATOR);
        }
    }

    let mut slug = latin
        .split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    // ASCII only from here on, so byte truncation is char-safe.
    slug.truncate(max_length);
    slug.trim_end_matches(SEPARATOR).to_string()
}

fn transliterate(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ґ' => "g",
        _ => return None,
    };
    Some(mapped)
}

//! Immutable core configuration.
//!
//! # Responsibility
//! - Carry the forbidden-term list, warning text, page size, slug length,
//!   route table and logging defaults in one value.
//! - Load overrides from a JSON document.
//!
//! # Invariants
//! - A config is validated once and then only read; services copy what they
//!   need at construction time.
//! - Missing document fields fall back to the defaults below.

use crate::logging::default_log_level;
use crate::routes::RouteConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_NEWS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SLUG_MAX_LENGTH: usize = 100;
pub const DEFAULT_MODERATION_WARNING: &str = "Не ругайтесь!";
pub const DEFAULT_FORBIDDEN_TERMS: &[&str] = &["редиска", "негодяй"];

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    ZeroNewsPageSize,
    ZeroSlugMaxLength,
    EmptyModerationWarning,
    BlankForbiddenTerm(usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::ZeroNewsPageSize => write!(f, "news_page_size must be greater than zero"),
            Self::ZeroSlugMaxLength => write!(f, "slug_max_length must be greater than zero"),
            Self::EmptyModerationWarning => write!(f, "moderation.warning must not be empty"),
            Self::BlankForbiddenTerm(index) => {
                write!(f, "moderation.forbidden_terms[{index}] must not be blank")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Comment moderation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Case-sensitive substrings rejected anywhere in comment text.
    pub forbidden_terms: Vec<String>,
    /// Field error attached to rejected text.
    pub warning: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            forbidden_terms: DEFAULT_FORBIDDEN_TERMS
                .iter()
                .map(|term| term.to_string())
                .collect(),
            warning: DEFAULT_MODERATION_WARNING.to_string(),
        }
    }
}

/// Log bootstrap settings consumed by `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory; logging stays off when unset.
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub moderation: ModerationConfig,
    /// Number of news items on the home page.
    pub news_page_size: u32,
    pub slug_max_length: usize,
    pub routes: RouteConfig,
    pub logging: LoggingConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            moderation: ModerationConfig::default(),
            news_page_size: DEFAULT_NEWS_PAGE_SIZE,
            slug_max_length: DEFAULT_SLUG_MAX_LENGTH,
            routes: RouteConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_json_str(&document)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.news_page_size == 0 {
            return Err(ConfigError::ZeroNewsPageSize);
        }
        if self.slug_max_length == 0 {
            return Err(ConfigError::ZeroSlugMaxLength);
        }
        if self.moderation.warning.trim().is_empty() {
            return Err(ConfigError::EmptyModerationWarning);
        }
        if let Some(index) = self
            .moderation
            .forbidden_terms
            .iter()
            .position(|term| term.trim().is_empty())
        {
            return Err(ConfigError::BlankForbiddenTerm(index));
        }
        Ok(())
    }
}

//! Operator CLI for noteboard core.
//!
//! # Responsibility
//! - Verify `noteboard_core` linkage and schema bootstrap.
//! - Expose slug derivation and moderation checks from the command line.
//! - Publish news items, the only write path for news.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use noteboard_core::db::migrations::current_user_version;
use noteboard_core::db::{open_db, DbError};
use noteboard_core::logging::LoggingError;
use noteboard_core::{
    init_logging_from_config, ConfigError, ContentModerator, CoreConfig, NewsItem,
    NewsRepository, RepoError, SlugAllocator, SlugError, SqliteNewsRepository, SystemClock,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Slug(SlugError),
    Output(std::io::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_invalid",
            Self::Logging(_) => "logging_failed",
            Self::Db(_) => "db_open_failed",
            Self::Repo(_) => "storage_failed",
            Self::Slug(_) => "slug_invalid",
            Self::Output(_) => "output_failed",
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Slug(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SlugError> for CliError {
    fn from(value: SlugError) -> Self {
        Self::Slug(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match execute(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!(
                "event=cli_command module=cli status=error error_code={}",
                err.code()
            );
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    init_logging_from_config(&config.logging)?;

    match cli.command {
        Some(command) => run(&config, command, out),
        None => {
            writeln!(out, "noteboard_core ping={}", noteboard_core::ping())?;
            writeln!(out, "noteboard_core version={}", noteboard_core::core_version())?;
            Ok(())
        }
    }
}

/// An explicit config path must load; defaults apply only without one.
fn load_config(path: Option<&Path>) -> Result<CoreConfig, ConfigError> {
    match path {
        Some(path) => CoreConfig::from_json_file(path),
        None => Ok(CoreConfig::default()),
    }
}

fn run(config: &CoreConfig, command: Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Slugify { title } => {
            let proposal = SlugAllocator::from_config(config).propose("", &title.join(" "))?;
            writeln!(out, "{}", proposal.slug)?;
        }
        Commands::Moderate { text } => {
            let moderator = ContentModerator::new(&config.moderation);
            match moderator.moderate(&text.join(" ")) {
                Ok(()) => writeln!(out, "ok")?,
                Err(rejected) => writeln!(out, "rejected: {rejected}")?,
            }
        }
        Commands::Migrate { db } => {
            let conn = open_db(&db)?;
            writeln!(out, "schema_version={}", current_user_version(&conn)?)?;
        }
        Commands::Publish { db, title, text } => {
            let conn = open_db(&db)?;
            let item = NewsItem::published_now(title, text.join(" "), &SystemClock);
            let news_id = SqliteNewsRepository::new(&conn).insert_news(&item)?;
            log::info!("event=news_publish module=cli status=ok news_id={news_id}");
            writeln!(out, "news_id={news_id}")?;
        }
    }
    Ok(())
}

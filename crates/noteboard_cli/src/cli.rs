use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "noteboard_cli", version, about = "Noteboard operator CLI")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "JSON config document; defaults are used when omitted"
    )]
    pub config: Option<PathBuf>,
    /// Prints ping/version when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Derive the slug a note with this title would get.
    Slugify {
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Check comment text against the forbidden-term list.
    Moderate {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Open (and migrate) a database file, then print its schema version.
    Migrate { db: PathBuf },
    /// Store a news item published now.
    Publish {
        db: PathBuf,
        title: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
}

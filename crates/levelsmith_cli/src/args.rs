//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use levelsmith_core::{DraftId, PublishedLevelId};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "levelsmith", version, about = "Manage level drafts and publications")]
pub struct Cli {
    /// Act as this user.
    #[arg(long = "as", global = true, value_name = "USERNAME")]
    pub caller: Option<String>,

    /// Database file; overrides LEVELSMITH_DB_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Account management.
    #[command(subcommand)]
    User(UserCommand),
    /// Private draft operations.
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Publish a draft into the public catalog.
    Publish(DraftRef),
    /// Copy a published draft's current name and content to its public level.
    Update(DraftRef),
    /// Remove a draft's public level.
    Unpublish(DraftRef),
    /// Public catalog reads.
    #[command(subcommand)]
    Level(LevelCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Add {
        username: String,
        #[arg(long)]
        icon: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Create an empty draft with a generated name.
    New,
    List,
    Show(DraftRef),
    /// Replace draft content with JSON from the argument or stdin.
    Set {
        draft_id: DraftId,
        /// JSON document; read from stdin when omitted.
        content: Option<String>,
    },
    Rename {
        draft_id: DraftId,
        name: String,
    },
    Delete(DraftRef),
}

#[derive(Debug, Subcommand)]
pub enum LevelCommand {
    Show { published_id: PublishedLevelId },
    /// Levels published by the caller.
    Mine,
}

#[derive(Debug, Args)]
pub struct DraftRef {
    pub draft_id: DraftId,
}

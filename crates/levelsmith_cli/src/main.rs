//! `levelsmith` command-line entry point.
//!
//! # Responsibility
//! - Wire environment config, logging and the SQLite store into the core
//!   lifecycle facade.
//! - Print every reply as JSON on stdout and every failure as JSON on
//!   stderr with a non-zero exit code.

mod args;
mod gate;

use args::{Cli, Command, DraftCommand, LevelCommand, UserCommand};
use clap::Parser;
use gate::UserDirectoryGate;
use levelsmith_core::db::{open_db, DbError};
use levelsmith_core::{
    init_logging, ConfigError, CoreConfig, IdentityGate, LevelError, LevelLifecycle,
    LevelPayload, RandomWordSource, RepoError, SqliteUserRepository, UserRepository, WordSource,
};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::process::ExitCode;

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 20;

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Level(LevelError),
    InvalidInput(String),
    Encode(serde_json::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "invalid_config",
            Self::Logging(_) => "logging_unavailable",
            Self::Db(err) if err.is_transient() => "storage_unavailable",
            Self::Db(_) => "storage",
            Self::Level(err) => err.code(),
            Self::InvalidInput(_) => "invalid_input",
            Self::Encode(_) => "encode_failed",
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Db(err) => err.is_transient(),
            Self::Level(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Level(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Encode(err) => write!(f, "failed to encode reply: {err}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<LevelError> for CliError {
    fn from(value: LevelError) -> Self {
        Self::Level(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Level(LevelError::from(value))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(reply) => {
            println!("{}", render(&reply));
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = json!({
                "error": err.code(),
                "message": err.to_string(),
                "retryable": err.is_retryable(),
            });
            eprintln!("{}", render(&body));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Value, CliError> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let log_dir = config.log_dir.as_deref().and_then(|dir| dir.to_str());
    init_logging(config.log_level, log_dir).map_err(CliError::Logging)?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    match cli.command {
        Command::User(UserCommand::Add { username, icon }) => {
            add_user(&conn, &username, icon.as_deref())
        }
        command => {
            let users = SqliteUserRepository::try_new(&conn)?;
            let gate = UserDirectoryGate::lookup(&users, cli.caller.as_deref())?;
            let levels =
                LevelLifecycle::new(&conn, gate, config.name_allocator(RandomWordSource));
            // An absent `--as` is an unknown caller, rejected by the gate.
            let token = cli.caller.unwrap_or_default();
            run_level_command(&levels, &token, command)
        }
    }
}

fn run_level_command<G: IdentityGate, W: WordSource>(
    levels: &LevelLifecycle<'_, G, W>,
    token: &str,
    command: Command,
) -> Result<Value, CliError> {
    let reply = match command {
        Command::User(UserCommand::Add { .. }) => {
            return Err(CliError::InvalidInput(
                "user commands do not act as a caller".to_string(),
            ))
        }
        Command::Draft(DraftCommand::New) => to_value(&levels.create_draft(token)?)?,
        Command::Draft(DraftCommand::List) => to_value(&levels.list_drafts(token)?)?,
        Command::Draft(DraftCommand::Show(target)) => {
            to_value(&levels.get_draft(token, target.draft_id)?)?
        }
        Command::Draft(DraftCommand::Set { draft_id, content }) => {
            let payload = read_payload(content)?;
            levels.set_draft_content(token, draft_id, &payload)?;
            json!({ "draft_id": draft_id })
        }
        Command::Draft(DraftCommand::Rename { draft_id, name }) => {
            levels.rename_draft(token, draft_id, &name)?;
            to_value(&levels.get_draft(token, draft_id)?)?
        }
        Command::Draft(DraftCommand::Delete(target)) => {
            levels.delete_draft(token, target.draft_id)?;
            json!({ "deleted": target.draft_id })
        }
        Command::Publish(target) => {
            let published_id = levels.publish(token, target.draft_id)?;
            json!({ "draft_id": target.draft_id, "published_id": published_id })
        }
        Command::Update(target) => {
            levels.update_published(token, target.draft_id)?;
            json!({ "draft_id": target.draft_id, "updated": true })
        }
        Command::Unpublish(target) => {
            levels.unpublish(token, target.draft_id)?;
            json!({ "draft_id": target.draft_id, "unpublished": true })
        }
        Command::Level(LevelCommand::Show { published_id }) => {
            to_value(&levels.get_published(published_id)?)?
        }
        Command::Level(LevelCommand::Mine) => to_value(&levels.list_my_published(token)?)?,
    };

    Ok(reply)
}

fn add_user(conn: &Connection, username: &str, icon: Option<&str>) -> Result<Value, CliError> {
    let username = username.trim();
    let chars = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&chars) {
        return Err(CliError::InvalidInput(format!(
            "username must be {USERNAME_MIN_CHARS}-{USERNAME_MAX_CHARS} characters, got {chars}"
        )));
    }

    let users = SqliteUserRepository::try_new(conn)?;
    let user = users.create_user(username, icon)?;
    info!("event=user_add module=cli status=ok user_id={}", user.id);
    to_value(&user)
}

/// Parses `content`, or stdin when it is absent.
fn read_payload(content: Option<String>) -> Result<LevelPayload, CliError> {
    let text = match content {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| CliError::InvalidInput(format!("failed to read stdin: {err}")))?;
            buffer
        }
    };
    LevelPayload::from_json(&text)
        .map_err(|err| CliError::InvalidInput(format!("content is not valid JSON: {err}")))
}

fn to_value<T: Serialize>(reply: &T) -> Result<Value, CliError> {
    serde_json::to_value(reply).map_err(CliError::Encode)
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

//! Account lookup and seeding.
//!
//! Account creation and credentials belong to the authentication layer; this
//! repository exists so tooling and tests can provision owners that drafts
//! and published levels reference.

use super::readiness::{ensure_connection_ready, USERS_COLUMNS};
use super::{parse_stored_id, RepoError, RepoResult};
use crate::db::DbError;
use crate::model::ids::UserId;
use crate::model::user::{User, DEFAULT_USER_ICON};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub trait UserRepository {
    /// Inserts a new account; `UsernameTaken` on a duplicate username.
    fn create_user(&self, username: &str, icon: Option<&str>) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("users", USERS_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str, icon: Option<&str>) -> RepoResult<User> {
        let user = User {
            id: UserId::new(),
            username: username.trim().to_string(),
            icon: icon.unwrap_or(DEFAULT_USER_ICON).to_string(),
        };

        let inserted = self.conn.execute(
            "INSERT INTO users (id, username, icon) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.username, user.icon],
        );
        match inserted {
            Ok(_) => Ok(user),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_unique_violation() {
                    Err(RepoError::UsernameTaken)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, icon FROM users WHERE id = ?1;",
                [id.to_string()],
                read_user_columns,
            )
            .optional()?
            .map(parse_user_columns)
            .transpose()
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, icon FROM users WHERE username = ?1;",
                [username.trim()],
                read_user_columns,
            )
            .optional()?
            .map(parse_user_columns)
            .transpose()
    }
}

type UserColumns = (String, String, String);

fn read_user_columns(row: &Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok((row.get("id")?, row.get("username")?, row.get("icon")?))
}

fn parse_user_columns((id, username, icon): UserColumns) -> RepoResult<User> {
    Ok(User {
        id: parse_stored_id(&id, "users.id")?,
        username,
        icon,
    })
}

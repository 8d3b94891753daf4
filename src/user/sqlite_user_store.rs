use super::auth::CredentialHasher;
use super::permissions::UserRole;
use super::user_store::{PasswordCredentials, User, UserStore};
use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
    DEFAULT_TIMESTAMP,
};
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::info;

const USER_TABLE: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!("role", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["username"]],
    indices: &[],
};

const USER_PASSWORD_CREDENTIALS_TABLE: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "user",
                foreign_column: "id",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    unique_constraints: &[&["user_id"]],
    indices: &[],
};

const USER_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[USER_TABLE, USER_PASSWORD_CREDENTIALS_TABLE],
    migration: None,
}];

pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

fn initialize(conn: Connection) -> Result<SqliteUserStore> {
    let latest_version = USER_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &USER_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating user db schema at version {}", latest_version);
        latest_schema.create(&conn)?;
    } else {
        let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        if db_version != (BASE_DB_VERSION + latest_version) as i64 {
            bail!(
                "User database has unexpected schema version {}, expected {}",
                db_version,
                BASE_DB_VERSION + latest_version
            );
        }
        latest_schema.validate(&conn)?;
    }

    conn.execute("PRAGMA foreign_keys = ON;", params![])?;
    Ok(SqliteUserStore {
        conn: Mutex::new(conn),
    })
}

impl SqliteUserStore {
    pub fn new(db_path: &Path) -> Result<Self> {
        initialize(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        initialize(Connection::open_in_memory()?)
    }
}

fn row_to_user(id: i64, username: String, role: String) -> Result<User> {
    let role = UserRole::from_str(&role).ok_or_else(|| anyhow!("unknown user role {}", role))?;
    Ok(User { id, username, role })
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, username: &str, role: UserRole) -> Result<i64> {
        if username.is_empty() {
            bail!("The username cannot be empty.");
        }
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (username, role) VALUES (?1, ?2)",
            params![username, role.as_str()],
        )
        .with_context(|| format!("Could not create user {}", username))?;
        Ok(conn.last_insert_rowid())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, username, role FROM user WHERE username = ?1",
            params![username],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?)),
        )
        .optional()?
        .map(|(id, username, role)| row_to_user(id, username, role))
        .transpose()
    }

    fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, username, role FROM user WHERE id = ?1",
            params![user_id],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?)),
        )
        .optional()?
        .map(|(id, username, role)| row_to_user(id, username, role))
        .transpose()
    }

    fn set_password_credentials(&self, credentials: PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_password_credentials (user_id, salt, hash, hasher)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id) DO UPDATE SET
                salt = excluded.salt,
                hash = excluded.hash,
                hasher = excluded.hasher",
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string()
            ],
        )?;
        Ok(())
    }

    fn get_password_credentials(&self, username: &str) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT c.user_id, c.salt, c.hash, c.hasher
             FROM user_password_credentials c
             JOIN user u ON u.id = c.user_id
             WHERE u.username = ?1",
            params![username],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?
        .map(|(user_id, salt, hash, hasher)| {
            Ok(PasswordCredentials {
                user_id,
                salt,
                hash,
                hasher: CredentialHasher::from_str(&hasher)?,
            })
        })
        .transpose()
    }
}

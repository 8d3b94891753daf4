use super::auth::CredentialHasher;
use super::permissions::UserRole;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct PasswordCredentials {
    pub user_id: i64,
    pub salt: String,
    pub hash: String,
    pub hasher: CredentialHasher,
}

pub trait UserStore: Send + Sync {
    /// Creates a new user and returns its id.
    /// Returns Err if the username is already taken or on a database error.
    fn create_user(&self, username: &str, role: UserRole) -> Result<i64>;

    /// Returns the user with the given username.
    /// Returns Ok(None) if the user does not exist.
    /// Returns Err if there is a database error.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Returns the user with the given id.
    /// Returns Ok(None) if the user does not exist.
    /// Returns Err if there is a database error.
    fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>>;

    /// Stores password credentials for a user, replacing existing ones.
    fn set_password_credentials(&self, credentials: PasswordCredentials) -> Result<()>;

    /// Returns the stored password credentials for a username.
    /// Returns Ok(None) if the user does not exist or has no password set.
    fn get_password_credentials(&self, username: &str) -> Result<Option<PasswordCredentials>>;
}

//! Idempotent administrator bootstrap, run once at startup.

use super::auth::CredentialHasher;
use super::permissions::UserRole;
use super::user_store::{PasswordCredentials, UserStore};
use anyhow::Result;
use std::env;
use tracing::{info, warn};

pub const ADMIN_LOGIN_ENV: &str = "ADMIN_LOGIN";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Creates the administrator account configured through `ADMIN_LOGIN` and
/// `ADMIN_PASSWORD`. Skipped when the variables are unset or an account with
/// that username already exists.
pub fn ensure_admin_user(user_store: &dyn UserStore) -> Result<()> {
    let (username, password) = match (env::var(ADMIN_LOGIN_ENV), env::var(ADMIN_PASSWORD_ENV)) {
        (Ok(username), Ok(password)) if !username.is_empty() => (username, password),
        _ => {
            warn!(
                "{} / {} not set, no administrator account will be bootstrapped",
                ADMIN_LOGIN_ENV, ADMIN_PASSWORD_ENV
            );
            return Ok(());
        }
    };
    bootstrap_admin(user_store, &username, &password)
}

pub fn bootstrap_admin(user_store: &dyn UserStore, username: &str, password: &str) -> Result<()> {
    if user_store.get_user_by_username(username)?.is_some() {
        info!("Account {} already exists, skipping bootstrap", username);
        return Ok(());
    }
    create_user_with_password(user_store, username, password, UserRole::Admin)?;
    info!("Created administrator account {}", username);
    Ok(())
}

/// Creates a user with argon2-hashed password credentials. Returns the new
/// user's id.
pub fn create_user_with_password(
    user_store: &dyn UserStore,
    username: &str,
    password: &str,
    role: UserRole,
) -> Result<i64> {
    let user_id = user_store.create_user(username, role)?;
    let hasher = CredentialHasher::Argon2;
    let salt = hasher.generate_b64_salt();
    let hash = hasher.hash(password.as_bytes(), &salt)?;
    user_store.set_password_credentials(PasswordCredentials {
        user_id,
        salt,
        hash,
        hasher,
    })?;
    Ok(user_id)
}

mod access_token;
mod auth;
mod bootstrap;
mod permissions;
mod sqlite_user_store;
mod user_store;

pub use access_token::{AccessTokenClaims, AccessTokenIssuer, DEFAULT_TOKEN_TTL_SECS};
pub use auth::CredentialHasher;
pub use bootstrap::{bootstrap_admin, create_user_with_password, ensure_admin_user};
pub use permissions::{Permission, UserRole};
pub use sqlite_user_store::SqliteUserStore;
pub use user_store::{PasswordCredentials, User, UserStore};

use super::error::ApiError;
use super::state::ServerState;
use crate::user::Permission;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::IntoResponse,
};
use tracing::debug;

/// An authenticated caller, extracted from a bearer access token. Routes that
/// are public simply do not ask for one.
#[derive(Debug)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub permissions: Vec<Permission>,
}

impl Session {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Safe method OR catalog editor; write handlers call this first.
pub fn require_catalog_editor(session: &Session) -> Result<(), ApiError> {
    if session.has_permission(Permission::EditCatalog) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub enum SessionExtractionError {
    AccessDenied,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::AccessDenied => ApiError::Forbidden.into_response(),
        }
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?;
    let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
    Some(
        value
            .strip_prefix("Bearer ")
            .map(|token| token.to_string())
            .unwrap_or(value),
    )
}

fn extract_session(parts: &Parts, ctx: &ServerState) -> Option<Session> {
    let token = match extract_bearer_token(parts) {
        None => {
            debug!("No access token in request headers.");
            return None;
        }
        Some(token) => token,
    };

    let claims = match ctx.token_issuer.verify(&token) {
        Some(claims) => claims,
        None => {
            debug!("Access token did not verify.");
            return None;
        }
    };

    // Permissions come from the stored role, not from token claims.
    let user = match ctx.user_store.get_user_by_id(claims.sub) {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("Access token for deleted user_id={}", claims.sub);
            return None;
        }
        Err(err) => {
            debug!("Failed to load user for session: {}", err);
            return None;
        }
    };

    Some(Session {
        user_id: user.id,
        username: user.username,
        permissions: user.role.permissions().to_vec(),
    })
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session(parts, ctx).ok_or(SessionExtractionError::AccessDenied)
    }
}

use anyhow::Result;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ApiError;
use super::http_layers::log_requests;
use super::state::{GuardedCatalogStore, GuardedUserStore, ServerState};
use super::{album_routes, musician_routes, song_routes, ServerConfig};
use crate::user::{AccessTokenIssuer, UserRole};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub musicians: usize,
    pub albums: usize,
    pub songs: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize)]
struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct LoginSuccessResponse {
    access: String,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        musicians: state.catalog_store.get_musicians_count(),
        albums: state.catalog_store.get_albums_count(),
        songs: state.catalog_store.get_songs_count(),
    };
    Json(stats)
}

/// Administrator login. Unknown username, wrong password and accounts without
/// the admin role all fail with the same message.
async fn login(
    State(state): State<ServerState>,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    let username = body
        .username
        .ok_or_else(|| ApiError::Validation("username is required".to_string()))?;
    let password = body
        .password
        .ok_or_else(|| ApiError::Validation("password is required".to_string()))?;

    let credentials = state
        .user_store
        .get_password_credentials(&username)
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    let password_matches = credentials
        .hasher
        .verify(password.as_str(), credentials.hash.as_str())
        .unwrap_or(false);
    if !password_matches {
        debug!("Login failed for {}: wrong password", username);
        return Err(ApiError::InvalidCredentials);
    }

    let user = state
        .user_store
        .get_user_by_id(credentials.user_id)
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::InvalidCredentials)?;
    if user.role != UserRole::Admin {
        debug!("Login failed for {}: not an administrator", username);
        return Err(ApiError::InvalidCredentials);
    }

    let access = state
        .token_issuer
        .issue(user.id, &user.username)
        .map_err(ApiError::Internal)?;
    Ok(Json(LoginSuccessResponse { access }).into_response())
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    user_store: GuardedUserStore,
) -> Router {
    let token_issuer = AccessTokenIssuer::new(
        &config.token_secret,
        Duration::from_secs(config.token_ttl_secs),
    );
    let state = ServerState {
        config,
        start_time: Instant::now(),
        catalog_store,
        user_store,
        token_issuer,
        hash: env!("GIT_HASH").to_string(),
    };

    let catalog_routes: Router<ServerState> = Router::new()
        .merge(musician_routes::router())
        .merge(album_routes::router())
        .merge(song_routes::router());

    Router::new()
        .route("/", get(home))
        .route("/v1/login/", post(login))
        .nest("/v1", catalog_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    user_store: GuardedUserStore,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store, user_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    Ok(axum::serve(listener, app).await?)
}

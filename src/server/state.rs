use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::user::{AccessTokenIssuer, UserStore};
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedUserStore = Arc<dyn UserStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub user_store: GuardedUserStore,
    pub token_issuer: AccessTokenIssuer,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserStore {
    fn from_ref(input: &ServerState) -> Self {
        input.user_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for AccessTokenIssuer {
    fn from_ref(input: &ServerState) -> Self {
        input.token_issuer.clone()
    }
}

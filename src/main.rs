use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use music_catalog_server::catalog_store::SqliteCatalogStore;
use music_catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use music_catalog_server::user::{
    ensure_admin_user, AccessTokenIssuer, SqliteUserStore, DEFAULT_TOKEN_TTL_SECS,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(value_parser = parse_path)]
    pub catalog_db: PathBuf,

    /// Path to the SQLite database file to use for user storage.
    #[clap(value_parser = parse_path)]
    pub user_db: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Access token lifetime in seconds.
    #[clap(long, default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_sec: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "Opening SQLite catalog database at {:?}...",
        cli_args.catalog_db
    );
    let catalog_store = Arc::new(SqliteCatalogStore::new(&cli_args.catalog_db)?);

    info!("Opening SQLite user database at {:?}...", cli_args.user_db);
    let user_store = Arc::new(SqliteUserStore::new(&cli_args.user_db)?);

    ensure_admin_user(user_store.as_ref())?;

    // Tokens issued before a restart only stay valid with a configured secret.
    let token_secret = std::env::var("TOKEN_SECRET")
        .unwrap_or_else(|_| AccessTokenIssuer::generate_secret());

    let config = ServerConfig {
        port: cli_args.port,
        requests_logging_level: cli_args.logging_level,
        token_secret,
        token_ttl_secs: cli_args.token_ttl_sec,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(config, catalog_store, user_store).await
}

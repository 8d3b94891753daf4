mod album_routes;
mod config;
mod error;
mod http_layers;
mod musician_routes;
mod server;
pub mod session;
mod song_routes;
pub mod state;
mod validate;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use http_layers::RequestsLoggingLevel;
pub use server::{make_app, run_server};

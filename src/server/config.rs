use super::http_layers::RequestsLoggingLevel;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// HS256 secret for access tokens. Random per process unless configured.
    pub token_secret: String,
    pub token_ttl_secs: u64,
}

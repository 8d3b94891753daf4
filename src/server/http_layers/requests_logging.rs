//! Request logging middleware

use super::super::state::ServerState;
use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
    Body,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

fn parse_content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get("content-length")?
        .to_str()
        .ok()?
        .parse::<usize>()
        .ok()
}

pub async fn log_requests(
    State(state): State<ServerState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level.clone();

    let start = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        info!("  Req Headers:");
        for header in request.headers().iter() {
            info!("    {:?}: {:?}", header.0, header.1);
        }
    }

    if level >= RequestsLoggingLevel::Body {
        match parse_content_length(request.headers()) {
            None => info!("  Req Body: no parseable Content-Length."),
            Some(size) if size >= MAX_LOGGABLE_BODY_LENGTH => {
                info!("  Req Body: {} bytes, too large to log.", size)
            }
            Some(size) => {
                let (parts, body) = request.into_parts();
                match axum::body::to_bytes(body, size).await {
                    Ok(bytes) => {
                        info!("  Req Body: {}", String::from_utf8_lossy(&bytes));
                        request = Request::from_parts(parts, Body::from(bytes));
                    }
                    Err(err) => {
                        error!("Failed to read request body: {:?}", err);
                        return axum::http::StatusCode::BAD_REQUEST.into_response();
                    }
                }
            }
        }
    }

    let response = next.run(request).await;

    if level > RequestsLoggingLevel::None {
        info!(
            "<<< {} {} {} in {:?}",
            method,
            uri,
            response.status(),
            start.elapsed()
        );
    }

    response
}

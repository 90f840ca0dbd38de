//! Route-subsystem error type.

use thiserror::Error;

/// Errors produced by `bt-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route has no waypoints")]
    Empty,

    #[error("malformed route: {0}")]
    Malformed(String),

    #[error("invalid encoded polyline at byte {0}")]
    Polyline(usize),

    #[error("directions service returned {status}: {message}")]
    Provider { status: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("route table error: {0}")]
    Table(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RouteResult<T> = Result<T, RouteError>;

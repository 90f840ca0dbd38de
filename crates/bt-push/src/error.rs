use bt_core::CoreError;
use bt_route::RouteError;
use bt_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("socket error: {0}")]
    Socket(#[from] axum::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PushResult<T> = Result<T, PushError>;

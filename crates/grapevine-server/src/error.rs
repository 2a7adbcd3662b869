use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use grapevine_engine::EngineError;
use grapevine_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Map a domain outcome to its HTTP status.
    ///
    /// Exhaustion never reaches this point (the engine folds it into the
    /// complete view), so what arrives is missing entities (404), rejected
    /// submissions (422), refused admin actions (409), or genuine failures.
    fn status(&self) -> StatusCode {
        match self {
            Self::Engine(EngineError::Store(
                StoreError::GameNotFound(_)
                | StoreError::ChainNotFound(_)
                | StoreError::MessageNotFound(_),
            )) => StatusCode::NOT_FOUND,
            Self::Engine(EngineError::InvalidAudio(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Engine(EngineError::Store(StoreError::NotPrunable { .. }))
            | Self::Engine(EngineError::SeedConflict(_)) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

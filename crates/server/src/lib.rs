use api_types::{Envelope, ResponseCode};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run, run_with_listener};

mod action;
mod payload;
mod product;
mod server;
mod user;

pub enum ServerError {
    Engine(EngineError),
    /// The request body is not valid JSON or does not match the expected shape.
    InvalidPayload(String),
    /// Missing or wrong Basic credentials on a protected route.
    Unauthenticated,
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::FORBIDDEN,
        EngineError::InvalidInput(_) | EngineError::NotFoundOrForbidden(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::NotFound(_)
        | EngineError::InsufficientStock(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::Conflict(_)
        | EngineError::InvalidCredentials => StatusCode::BAD_REQUEST,
        EngineError::PasswordHash(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        EngineError::Unauthorized(reason) => {
            tracing::debug!("unauthorized: {reason}");
            EngineError::Unauthorized(reason).to_string()
        }
        other => other.to_string(),
    }
}

fn code_for_status(status: StatusCode) -> ResponseCode {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ResponseCode::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => ResponseCode::InvalidInput,
        status if status.is_server_error() => ResponseCode::ServerError,
        status if status.is_success() => ResponseCode::Success,
        _ => ResponseCode::BadRequest,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, response) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::InvalidPayload(reason) => (StatusCode::UNPROCESSABLE_ENTITY, reason),
            ServerError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid credentials".to_string(),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        let body = Envelope {
            code: code_for_status(status),
            response,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

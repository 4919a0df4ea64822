use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Wire-level failure: a status, a stable code and a message. Never carries
/// a payload.
#[derive(Debug)]
pub struct RpcError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl RpcError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", message)
    }
}

impl From<ServiceError> for RpcError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::AlreadyExists { .. } => {
                Self::new(StatusCode::CONFLICT, "ALREADY_EXISTS", message)
            }
            ServiceError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
            ServiceError::Validation(_) => Self::invalid_argument(message),
            ServiceError::Io { .. }
            | ServiceError::Corrupt { .. }
            | ServiceError::Serialization(_)
            | ServiceError::Task(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "rpc failed");
        } else {
            warn!(code = self.code, error = %self.message, "rpc rejected");
        }
        let body = serde_json::json!({"error": {"code": self.code, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

/// JSON request body whose rejections are reported as `INVALID_ARGUMENT`.
pub struct RpcRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for RpcRequest<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(RpcError::invalid_argument(rejection.body_text())),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot open store: {0}")]
    Store(#[from] ServiceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::EntityKind;

    #[test]
    fn service_errors_map_one_to_one() {
        let cases = [
            (
                ServiceError::AlreadyExists { entity: EntityKind::Author, key: "\"A\"".into() },
                StatusCode::CONFLICT,
                "ALREADY_EXISTS",
            ),
            (ServiceError::not_found(EntityKind::Book, "b"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            (
                ServiceError::Io {
                    path: "db.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
            ),
            (
                ServiceError::Corrupt { path: "db.json".into(), reason: "expected an array".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
            ),
            (
                ServiceError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
            ),
            (ServiceError::Task("panicked".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        ];
        for (err, status, code) in cases {
            let rpc = RpcError::from(err);
            assert_eq!(rpc.status, status);
            assert_eq!(rpc.code, code);
        }
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let rpc = RpcError::from(ServiceError::not_found(EntityKind::Author, "abc"));
        assert_eq!(rpc.message, "Author \"abc\" not found");
    }
}

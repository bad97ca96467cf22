use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use memgate::GatewayError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Wraps the pipeline's error taxonomy at the HTTP boundary — the sole
/// translator from `GatewayError` kinds to status codes and wire shape.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Auth(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("request body exceeds 128 KiB")]
    BodyTooLarge,

    #[error("not found")]
    NotFound,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<String>,
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Gateway(err) => match err {
                GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
                GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                GatewayError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                GatewayError::RemoteUnavailable(_)
                | GatewayError::RemoteRejected(_)
                | GatewayError::InsufficientFunds(_)
                | GatewayError::Reverted(_) => StatusCode::BAD_GATEWAY,
                GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ServerError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServerError::Gateway(err) => err.kind(),
            ServerError::Auth(_) => "KindUnauthorized",
            ServerError::RateLimited => "KindRateLimited",
            ServerError::BodyTooLarge => "KindPayloadTooLarge",
            ServerError::NotFound => "KindBadRequest",
        }
    }

    /// Remote-facing kinds carry backend detail separately from `detail` so
    /// a caller can show a generic sentence and still log the raw reason.
    fn backend_detail(&self) -> Option<String> {
        match self {
            ServerError::Gateway(
                GatewayError::RemoteUnavailable(msg)
                | GatewayError::RemoteRejected(msg)
                | GatewayError::InsufficientFunds(msg)
                | GatewayError::Reverted(msg),
            ) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        if matches!(self, ServerError::Gateway(GatewayError::Internal(_))) {
            tracing::error!(error = %self, "internal error");
        }

        let body = ErrorBody {
            detail: self.to_string(),
            kind,
            backend: self.backend_detail(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err: ServerError = GatewayError::BadRequest("nope".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "KindBadRequest");
    }

    #[test]
    fn timeout_maps_to_504() {
        let err: ServerError = GatewayError::Timeout("slow".into()).into();
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn rate_limited_maps_to_429() {
        assert_eq!(ServerError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ServerError::RateLimited.kind(), "KindRateLimited");
    }
}

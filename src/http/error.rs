//! Mapping of [`ServiceError`] onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::{ErrorKind, ServiceError};

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput | ErrorKind::IllegalMove => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidState | ErrorKind::WrongTurn | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        if self.kind().is_client_error() {
            debug!(%status, error = %self, "Request rejected");
        } else {
            error!(%status, error = %self, "Request failed");
        }
        (status, Json(self)).into_response()
    }
}

/// Unwraps a JSON body, turning a malformed one into `INVALID_INPUT`.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ServiceError::invalid_input(format!("Malformed request body: {}", e.body_text())))
}

/// Unwraps a path extraction, turning a malformed id into `INVALID_INPUT`.
pub fn path_param<T>(
    param: Result<axum::extract::Path<T>, PathRejection>,
) -> Result<T, ServiceError> {
    param
        .map(|axum::extract::Path(value)| value)
        .map_err(|e| ServiceError::invalid_input(format!("Malformed path: {}", e.body_text())))
}

/// Unwraps a query extraction, turning a malformed query into `INVALID_INPUT`.
pub fn query_param<T>(
    query: Result<axum::extract::Query<T>, QueryRejection>,
) -> Result<T, ServiceError> {
    query
        .map(|axum::extract::Query(value)| value)
        .map_err(|e| ServiceError::invalid_input(format!("Malformed query: {}", e.body_text())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::IllegalMove), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::WrongTurn), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::UpstreamUnavailable), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_status() {
        let response = ServiceError::not_found("Game x not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

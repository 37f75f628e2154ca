//! Handler-facing error type and its HTTP rendering.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Body was not usable JSON; the status comes from the rejection itself
    /// (415 wrong content type, 400 bad syntax, 422 wrong shape).
    #[error(transparent)]
    Payload(#[from] JsonRejection),

    #[error(transparent)]
    InvalidQuery(#[from] QueryRejection),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

/// JSON error object. `uri` is filled in by [`attach_request_uri`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl AppError {
    /// Store failure on a read path: infrastructure problems become 500.
    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Rejected(msg) => AppError::Unprocessable(msg),
            StoreError::Connection(_) | StoreError::Query(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }

    /// Store failure on a write path: infrastructure problems become 409.
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::Connection(_) | StoreError::Query(_) => {
                AppError::Conflict(err.to_string())
            }
            other => Self::from_read(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Payload(rejection) => rejection.status(),
            AppError::InvalidQuery(rejection) => rejection.status(),
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Payload(_) => "INVALID_PAYLOAD",
            AppError::InvalidQuery(_) => "INVALID_QUERY",
            AppError::Unprocessable(_) => "UNPROCESSABLE",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Plain `?` on a store call uses the read-path mapping.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::from_read(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Payload(rejection) => rejection.body_text(),
            AppError::InvalidQuery(rejection) => rejection.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() || status == StatusCode::CONFLICT {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code(),
            error: message,
            uri: None,
        };
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Middleware: re-render error bodies produced by [`AppError`] with the
/// path of the request that failed.
pub async fn attach_request_uri(
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(body) = response.extensions().get::<ErrorBody>().cloned() else {
        return response;
    };

    let body = ErrorBody {
        uri: Some(uri.path().to_string()),
        ..body
    };
    (response.status(), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_on_both_paths() {
        assert_eq!(
            AppError::from_read(StoreError::NotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from_write(StoreError::NotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn rejected_values_map_to_422() {
        let err = AppError::from_write(StoreError::Rejected("null value in column".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn infrastructure_failure_depends_on_path() {
        let read = AppError::from_read(StoreError::Connection(sqlx::Error::PoolTimedOut));
        assert_eq!(read.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let write = AppError::from_write(StoreError::Query(sqlx::Error::RowNotFound));
        assert_eq!(write.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn question_mark_conversion_uses_read_mapping() {
        let err: AppError = StoreError::Connection(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_carries_status_and_body_extension() {
        let response = AppError::BadRequest("invalid id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.extensions().get::<ErrorBody>().unwrap();
        assert_eq!(body.code, "BAD_REQUEST");
        assert_eq!(body.error, "invalid id");
        assert!(body.uri.is_none());
    }
}

//! HTTP error responses.
//!
//! Every failure leaves the server as `{"detail": "<message>"}`. Storage
//! failures carry the fixed message of the route that failed; the
//! underlying cause is logged, not returned. Request bodies that are not
//! valid JSON for the route are 422.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use seismic_core::ServiceError;
use serde::Serialize;

pub const OBSERVATION_NOT_FOUND: &str = "Seismic activity not found";
pub const ADD_OBSERVATION_FAILED: &str = "Can't add new Danger data";
pub const UPDATE_OBSERVATION_FAILED: &str = "Can't update Danger data";
pub const DELETE_OBSERVATIONS_FAILED: &str = "Can't delete Danger data";
pub const ADD_STATION_FAILED: &str = "Can't add new Station data";
pub const ADD_HAZARD_TYPE_FAILED: &str = "Can't add new Type data";
pub const LIST_OBSERVATIONS_FAILED: &str = "Can't read Danger data";
pub const LIST_REFERENCE_FAILED: &str = "Can't read reference data";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// Maps a service failure to a response. `failure_detail` is the fixed
    /// message reported for storage failures of the calling route.
    pub fn from_service(err: ServiceError, failure_detail: &'static str) -> Self {
        match err {
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::InvalidInput(message) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            err @ (ServiceError::Storage { .. } | ServiceError::InconsistentState(_)) => {
                error!("event=http_request module=api status=error detail={failure_detail:?} error={err}");
                Self::internal(failure_detail)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                detail: &self.detail,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, ADD_STATION_FAILED};
    use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
    use seismic_core::{RepoError, ServiceError, ServiceOperation};

    #[test]
    fn not_found_keeps_service_message() {
        let err = ApiError::from_service(
            ServiceError::NotFound("observation not found: station_id=3".into()),
            ADD_STATION_FAILED,
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "observation not found: station_id=3");
    }

    #[test]
    fn invalid_input_is_unprocessable() {
        let err = ApiError::from_service(
            ServiceError::InvalidInput("station name must not be blank".into()),
            ADD_STATION_FAILED,
        );
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_failure_uses_fixed_detail() {
        let err = ApiError::from_service(
            ServiceError::Storage {
                operation: ServiceOperation::AddStation,
                source: RepoError::MissingRequiredTable("station"),
            },
            ADD_STATION_FAILED,
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, ADD_STATION_FAILED);
    }
}

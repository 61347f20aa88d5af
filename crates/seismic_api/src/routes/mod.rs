pub(crate) mod meta;
pub(crate) mod reference;
pub(crate) mod seismic_activity;

use crate::error::{ApiError, ApiResult};
use crate::ApiState;
use log::error;
use seismic_core::{ObservationService, ServiceResult};

/// Runs one service call on the blocking pool.
///
/// `failure_detail` is reported for storage failures and for a worker that
/// panicked or was cancelled.
pub(crate) async fn run_service<T, F>(
    state: &ApiState,
    failure_detail: &'static str,
    work: F,
) -> ApiResult<T>
where
    F: FnOnce(&ObservationService) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service().clone();
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|err| {
            error!("event=blocking_task module=api status=error error={err}");
            ApiError::internal(failure_detail)
        })?
        .map_err(|err| ApiError::from_service(err, failure_detail))
}

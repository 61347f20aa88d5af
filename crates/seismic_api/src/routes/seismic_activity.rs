//! Observation routes under `/api/seismicactivity`.

use super::run_service;
use crate::error::{
    ApiError, ApiResult, ADD_OBSERVATION_FAILED, DELETE_OBSERVATIONS_FAILED,
    LIST_OBSERVATIONS_FAILED, OBSERVATION_NOT_FOUND, UPDATE_OBSERVATION_FAILED,
};
use crate::ApiState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use seismic_core::ObservationDto;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct DeleteResponse {
    deleted: usize,
}

pub(crate) async fn list(State(state): State<ApiState>) -> ApiResult<Json<Vec<ObservationDto>>> {
    let observations = run_service(&state, LIST_OBSERVATIONS_FAILED, |service| {
        service.list_observations()
    })
    .await?;
    Ok(Json(observations))
}

pub(crate) async fn by_station_name(
    State(state): State<ApiState>,
    Path(station_name): Path<String>,
) -> ApiResult<Json<ObservationDto>> {
    let observation = run_service(&state, LIST_OBSERVATIONS_FAILED, move |service| {
        service.observation_by_station_name(&station_name)
    })
    .await?;
    observation
        .map(Json)
        .ok_or_else(|| ApiError::not_found(OBSERVATION_NOT_FOUND))
}

pub(crate) async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<ObservationDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ObservationDto>)> {
    let Json(dto) = payload?;
    let created = run_service(&state, ADD_OBSERVATION_FAILED, move |service| {
        service.add_observation(&dto)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn update(
    State(state): State<ApiState>,
    payload: Result<Json<ObservationDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ObservationDto>)> {
    let Json(dto) = payload?;
    let updated = run_service(&state, UPDATE_OBSERVATION_FAILED, move |service| {
        service.update_observation(&dto)
    })
    .await?;
    Ok((StatusCode::ACCEPTED, Json(updated)))
}

pub(crate) async fn delete_by_station_name(
    State(state): State<ApiState>,
    Path(station_name): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = run_service(&state, DELETE_OBSERVATIONS_FAILED, move |service| {
        service.delete_observations_by_station_name(&station_name)
    })
    .await?;
    Ok(Json(DeleteResponse { deleted }))
}

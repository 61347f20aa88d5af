//! Station and hazard type routes.

use super::run_service;
use crate::error::{
    ApiResult, ADD_HAZARD_TYPE_FAILED, ADD_STATION_FAILED, LIST_REFERENCE_FAILED,
};
use crate::ApiState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use seismic_core::{HazardTypeDto, StationDto};

pub(crate) async fn list_stations(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<StationDto>>> {
    let stations = run_service(&state, LIST_REFERENCE_FAILED, |service| {
        service.list_stations()
    })
    .await?;
    Ok(Json(stations))
}

pub(crate) async fn create_station(
    State(state): State<ApiState>,
    payload: Result<Json<StationDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StationDto>)> {
    let Json(dto) = payload?;
    let station = run_service(&state, ADD_STATION_FAILED, move |service| {
        service.add_station(&dto)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(station)))
}

pub(crate) async fn list_hazard_types(
    State(state): State<ApiState>,
) -> ApiResult<Json<Vec<HazardTypeDto>>> {
    let hazard_types = run_service(&state, LIST_REFERENCE_FAILED, |service| {
        service.list_hazard_types()
    })
    .await?;
    Ok(Json(hazard_types))
}

pub(crate) async fn create_hazard_type(
    State(state): State<ApiState>,
    payload: Result<Json<HazardTypeDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HazardTypeDto>)> {
    let Json(dto) = payload?;
    let hazard_type = run_service(&state, ADD_HAZARD_TYPE_FAILED, move |service| {
        service.add_type(&dto)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(hazard_type)))
}

use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::office::OfficeParam;
use crate::api::dtos::responses::{CalendarResponse, SlotsResponse};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use tracing::debug;

fn date_param(params: &HashMap<String, String>, key: &str) -> Result<NaiveDate, AppError> {
    let raw = params.get(key).ok_or_else(|| AppError::Validation(format!("{} required", key)))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} date, expected YYYY-MM-DD", key)))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    OfficeParam(office): OfficeParam,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let date = date_param(&params, "date")?;
    let procedure_id = params.get("procedure_id")
        .ok_or(AppError::Validation("procedure_id required".into()))?
        .clone();

    let slots = state.booking_service.available_slots(office, date, &procedure_id, Utc::now()).await?;
    debug!("{} slots for {} on {}", slots.iter().filter(|s| s.available).count(), office, date);

    Ok(Json(SlotsResponse { date, office, procedure_id, slots }))
}

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    OfficeParam(office): OfficeParam,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start = date_param(&params, "start")?;
    let end = date_param(&params, "end")?;

    let days = state.booking_service.calendar(office, start, end, Utc::now()).await?;

    Ok(Json(CalendarResponse { office, days }))
}

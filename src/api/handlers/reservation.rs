use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AdminSession;
use crate::api::dtos::requests::CreateReservationRequest;
use crate::domain::services::{availability::day_bounds, booking_service::ReservationRequest};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = DateTime::parse_from_rfc3339(&payload.start)
        .map_err(|_| AppError::Validation("Invalid start, expected an RFC 3339 timestamp".into()))?
        .with_timezone(&Utc);

    info!("create_reservation: {} / {} at {}", payload.office, payload.procedure_id, start);

    let confirmation = state.booking_service.create_reservation(ReservationRequest {
        office: payload.office,
        procedure_id: payload.procedure_id,
        start,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        email: payload.email,
        note: payload.note,
    }, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Reservations of every office starting between `start` and `end`
/// (inclusive local dates; defaults to the coming week).
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let tz = state.booking_service.timezone();
    let today = Utc::now().with_timezone(&tz).date_naive();

    let parse = |key: &str, default: NaiveDate| -> Result<NaiveDate, AppError> {
        match params.get(key) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation(format!("Invalid {} date, expected YYYY-MM-DD", key))),
            None => Ok(default),
        }
    };
    let start = parse("start", today)?;
    let end = parse("end", today + Duration::days(7))?;

    if end < start {
        return Err(AppError::Validation("End date must not be before start date".into()));
    }

    let (range_start, _) = day_bounds(start, tz).ok_or(AppError::Validation("Invalid start date".into()))?;
    let (_, range_end) = day_bounds(end, tz).ok_or(AppError::Validation("Invalid end date".into()))?;

    let reservations = state.reservation_repo.list_between(range_start, range_end).await?;
    Ok(Json(reservations))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.reservation_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;
    Ok(Json(reservation))
}

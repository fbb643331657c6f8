use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AdminSession, office::OfficeParam};
use crate::api::dtos::requests::CreateClosureRequest;
use crate::domain::models::{closure::ScheduleClosure, office::Office};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

/// Closures of one office that have not ended yet.
pub async fn list_upcoming_closures(
    State(state): State<Arc<AppState>>,
    OfficeParam(office): OfficeParam,
) -> Result<impl IntoResponse, AppError> {
    let closures = state.closure_repo.list_upcoming(office.as_str(), Utc::now()).await?;
    Ok(Json(closures))
}

pub async fn admin_list_closures(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let closures = state.closure_repo.list_all().await?;
    Ok(Json(closures))
}

pub async fn create_closure(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Json(payload): Json<CreateClosureRequest>,
) -> Result<impl IntoResponse, AppError> {
    let office: Office = payload.office.parse()
        .map_err(|e| AppError::Validation(format!("Invalid office: {}", e)))?;

    if payload.closed_date_end <= payload.closed_date_start {
        return Err(AppError::Validation("Closure end must be after its start".into()));
    }

    let closure = ScheduleClosure::new(office, payload.closed_date_start, payload.closed_date_end);
    let created = state.closure_repo.create(&closure).await?;
    info!("Closed {} from {} to {}", office, created.closed_date_start, created.closed_date_end);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_closure(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.closure_repo.delete(&id).await?;
    info!("Deleted closure: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AdminSession, maybe_auth::MaybeAdmin};
use crate::api::dtos::{
    requests::{CreateProcedureRequest, SetActiveRequest, UpdateProcedureRequest},
    responses::{PopularProcedure, ProcedureView},
};
use crate::domain::models::{category::build_catalog, procedure::{NewProcedureParams, Procedure}};
use crate::domain::services::{
    statistics::most_booked_ids,
    validation::{non_blank, validate_procedure, ProcedureFields},
};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::info;

pub const POPULAR_WINDOW_DAYS: i64 = 30;
pub const POPULAR_DEFAULT_LIMIT: usize = 6;
const POPULAR_MAX_LIMIT: usize = 50;

fn views(procedures: Vec<Procedure>) -> Vec<ProcedureView> {
    procedures.into_iter().map(ProcedureView::from).collect()
}

pub async fn list_procedures(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let procedures = match params.get("type").map(|t| t.trim()).filter(|t| !t.is_empty()) {
        Some(type_prefix) => state.procedure_repo.list_active_by_type(type_prefix).await?,
        None => state.procedure_repo.list_active().await?,
    };
    Ok(Json(views(procedures)))
}

pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let procedures = state.procedure_repo.list_active().await?;
    Ok(Json(build_catalog(procedures)))
}

pub async fn list_discounted(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let procedures = state.procedure_repo.list_discounted().await?;
    Ok(Json(views(procedures)))
}

/// Active procedures most often booked over the last 30 days.
pub async fn list_popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let limit = match params.get("limit") {
        Some(raw) => raw.parse::<usize>()
            .map_err(|_| AppError::Validation("limit must be a positive number".into()))?
            .clamp(1, POPULAR_MAX_LIMIT),
        None => POPULAR_DEFAULT_LIMIT,
    };

    let since = Utc::now() - Duration::days(POPULAR_WINDOW_DAYS);
    let logs = state.reservation_repo.list_logs_since(since).await?;

    // rank over every booked procedure, inactive ones drop out below
    let ranked = most_booked_ids(&logs, usize::MAX);
    let ids: Vec<String> = ranked.iter().map(|(id, _)| id.clone()).collect();
    let mut active: HashMap<String, Procedure> = state.procedure_repo.list_active_by_ids(&ids).await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    let popular: Vec<PopularProcedure> = ranked
        .into_iter()
        .filter_map(|(id, bookings)| {
            active.remove(&id).map(|p| PopularProcedure { procedure: p.into(), bookings })
        })
        .take(limit)
        .collect();

    Ok(Json(popular))
}

pub async fn get_procedure(
    State(state): State<Arc<AppState>>,
    MaybeAdmin(is_admin): MaybeAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let procedure = if is_admin {
        state.procedure_repo.find_by_id(&id).await?
    } else {
        state.procedure_repo.find_active_by_id(&id).await?
    };

    let procedure = procedure.ok_or(AppError::NotFound("Procedure not found".into()))?;
    Ok(Json(ProcedureView::from(procedure)))
}

pub async fn admin_list_procedures(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let procedures = state.procedure_repo.list_all().await?;
    Ok(Json(views(procedures)))
}

pub async fn create_procedure(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Json(payload): Json<CreateProcedureRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_procedure(&ProcedureFields {
        name: &payload.name,
        duration_minutes: payload.duration_minutes,
        price: payload.price,
        discount_percentage: payload.discount_percentage,
        procedure_type: &payload.procedure_type,
        technician: &payload.technician,
    })?;

    let procedure = Procedure::new(NewProcedureParams {
        name: payload.name.trim().to_string(),
        description: non_blank(payload.description),
        duration_minutes: payload.duration_minutes,
        price: payload.price,
        discount_percentage: payload.discount_percentage,
        procedure_type: payload.procedure_type.trim().to_string(),
        technician: payload.technician.trim().to_string(),
    });

    let created = state.procedure_repo.create(&procedure).await?;
    info!("Created procedure: {} ({})", created.name, created.id);

    Ok((StatusCode::CREATED, Json(ProcedureView::from(created))))
}

pub async fn update_procedure(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProcedureRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut procedure = state.procedure_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Procedure not found".into()))?;

    if let Some(name) = payload.name { procedure.name = name.trim().to_string(); }
    if payload.description.is_some() { procedure.description = non_blank(payload.description); }
    if let Some(duration) = payload.duration_minutes { procedure.duration_minutes = duration; }
    if let Some(price) = payload.price { procedure.price = price; }
    if let Some(discount) = payload.discount_percentage { procedure.discount_percentage = Some(discount); }
    if let Some(procedure_type) = payload.procedure_type { procedure.procedure_type = procedure_type.trim().to_string(); }
    if let Some(technician) = payload.technician { procedure.technician = technician.trim().to_string(); }

    validate_procedure(&ProcedureFields {
        name: &procedure.name,
        duration_minutes: procedure.duration_minutes,
        price: procedure.price,
        discount_percentage: procedure.discount_percentage,
        procedure_type: &procedure.procedure_type,
        technician: &procedure.technician,
    })?;
    procedure.discount_percentage = procedure.discount_percentage.filter(|d| *d > 0);

    let updated = state.procedure_repo.update(&procedure).await?;
    info!("Updated procedure: {}", updated.id);

    Ok(Json(ProcedureView::from(updated)))
}

pub async fn set_procedure_active(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.procedure_repo.set_active(&id, payload.is_active).await?;
    info!("Procedure {} is_active={}", updated.id, updated.is_active);

    Ok(Json(ProcedureView::from(updated)))
}

pub async fn delete_procedure(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.procedure_repo.delete(&id).await?;
    info!("Deleted procedure: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

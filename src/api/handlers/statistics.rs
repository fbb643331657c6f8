use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminSession;
use crate::api::dtos::responses::StatisticsResponse;
use crate::domain::services::statistics::procedure_stats;
use crate::error::AppError;
use std::sync::Arc;

pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AppError> {
    let procedures = state.procedure_repo.list_all().await?;
    let logs = state.reservation_repo.list_logs().await?;

    Ok(Json(StatisticsResponse {
        total_reservations: logs.len(),
        procedures: procedure_stats(&procedures, &logs),
    }))
}
